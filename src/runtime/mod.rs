use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::catalog::Catalog;
use crate::logging;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (mut settings, config_warning) = settings::load_settings();

    // A directory argument scans that directory in addition to the configured tracks.
    if let Some(dir) = env::args().nth(1) {
        settings.catalog.scan_dir = Some(PathBuf::from(dir));
    }

    match logging::init(&settings.logging) {
        Ok(path) => log::info!("trackdeck starting, logging to {}", path.display()),
        Err(e) => eprintln!("trackdeck: cannot open log file: {e}"),
    }
    if let Some(msg) = config_warning {
        log::warn!("{msg}");
    }

    let catalog = Catalog::from_settings(&settings.catalog);
    log::info!("catalog has {} tracks", catalog.len());

    let audio_player = AudioPlayer::new(catalog.clone(), settings.audio.clone());
    let mut app = App::new(catalog);
    app.set_playback_handle(audio_player.playback_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &mpris,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        log::error!("event loop failed: {e}");
    }
    log::info!("trackdeck exiting");
    run_result
}
