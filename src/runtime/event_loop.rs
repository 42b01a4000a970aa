use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, HitMap, PlaybackState, PointerAction};
use crate::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use crate::catalog::TrackId;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// Redraw cadence of the terminal; the audio thread ticks on its own.
const UI_FRAME: Duration = Duration::from_millis(33);

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Last active track, playback state and duration pushed to MPRIS.
    last_mpris: (Option<TrackId>, PlaybackState, Duration),
    /// Last visibility sent to the audio thread.
    last_visible: Option<bool>,
}

impl EventLoopState {
    /// Construct a new `EventLoopState` seeded from `app`.
    pub fn new(app: &App) -> Self {
        Self {
            pending_gg: false,
            last_mpris: (None, app.playback, Duration::ZERO),
            last_visible: None,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let info = app.snapshot();
        app.sync_playback(&info);

        // Keep MPRIS in sync even when playback changes come from media keys or end-of-track.
        let mpris_view = (info.active, app.playback, info.duration);
        if mpris_view != state.last_mpris {
            update_mpris(mpris, app, &info);
            state.last_mpris = mpris_view;
        }

        let mut hits = HitMap::default();
        terminal.draw(|f| hits = ui::draw(f, app, &info, settings))?;
        app.hits = hits;

        let visible = app.viewport_visible(&info);
        if state.last_visible != Some(visible) {
            log::debug!("player visible: {visible}");
            let _ = audio_player.send(AudioCmd::SetVisible(visible));
            state.last_visible = Some(visible);
        }

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, &info, audio_player) {
                return Ok(());
            }
        }

        if event::poll(UI_FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, &info, audio_player, state) {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, &info, audio_player),
                Event::FocusGained => app.focused = true,
                Event::FocusLost => app.focused = false,
                _ => {}
            }
        }
    }

    Ok(())
}

fn toggle(audio_player: &AudioPlayer, id: TrackId) {
    let _ = audio_player.send(AudioCmd::TogglePlay(id));
}

/// Start `id` unless it is already the playing track.
fn play(audio_player: &AudioPlayer, info: &PlaybackInfo, id: TrackId) {
    if !(info.is_active(id) && info.playing) {
        toggle(audio_player, id);
    }
}

/// Apply a desktop media-control command. Returns `true` on quit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    info: &PlaybackInfo,
    audio_player: &AudioPlayer,
) -> bool {
    let target = info.active.or_else(|| app.selected_id());
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        ControlCmd::Play => {
            if let Some(id) = target {
                play(audio_player, info, id);
            }
        }
        ControlCmd::Pause | ControlCmd::Stop => {
            if let (Some(id), true) = (info.active, info.playing) {
                toggle(audio_player, id);
            }
        }
        ControlCmd::PlayPause => {
            if let Some(id) = target {
                toggle(audio_player, id);
            }
        }
        ControlCmd::Next | ControlCmd::Prev => {
            let forward = cmd == ControlCmd::Next;
            if let Some(id) = app.adjacent_id(info, forward) {
                app.select_id(id);
                play(audio_player, info, id);
            }
        }
    }
    false
}

/// Returns `true` when the user asked to quit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    info: &PlaybackInfo,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) -> bool {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => {
            if let Some(id) = app.selected_id() {
                toggle(audio_player, id);
            }
        }
        KeyCode::Char('L') | KeyCode::Char('H') => {
            let secs = i64::try_from(settings.controls.seek_seconds).unwrap_or(i64::MAX);
            let delta = if key.code == KeyCode::Char('L') { secs } else { -secs };
            if info.active.is_some() {
                let _ = audio_player.send(AudioCmd::SeekBy(delta));
            }
        }
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc => app.metadata_window = false,
        _ => {}
    }

    false
}

fn handle_mouse_event(
    mouse: MouseEvent,
    app: &mut App,
    info: &PlaybackInfo,
    audio_player: &AudioPlayer,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match app.pointer_down(mouse.column, mouse.row, info) {
                PointerAction::Toggle(id) => toggle(audio_player, id),
                PointerAction::Seek(to) => {
                    let _ = audio_player.send(AudioCmd::Seek(to));
                }
                PointerAction::None => {}
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(to) = app.pointer_drag(mouse.column, info) {
                let _ = audio_player.send(AudioCmd::Seek(to));
            }
        }
        // Any release ends a scrub, wherever the pointer is.
        MouseEventKind::Up(_) => app.pointer_up(),
        MouseEventKind::ScrollDown => app.next(),
        MouseEventKind::ScrollUp => app.prev(),
        _ => {}
    }
}
