use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::config::AudioSettings;

use super::controller::TrackPlayerController;
use super::media::AudioBackend;
use super::types::{AudioCmd, PlaybackHandle};

/// Run the controller on its own thread.
///
/// The backend is built on that thread because the output stream is not
/// guaranteed to be `Send`. Commands are applied as they arrive; between them
/// `recv_timeout` paces the frame ticks.
pub(super) fn spawn_audio_thread<B, F>(
    make_backend: F,
    catalog: Catalog,
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()>
where
    B: AudioBackend + 'static,
    F: FnOnce() -> B + Send + 'static,
{
    thread::spawn(move || {
        let mut controller = TrackPlayerController::new(make_backend(), catalog, &audio_settings);
        let frame = Duration::from_millis(audio_settings.frame_interval_ms.max(1));
        let mut next_tick = Instant::now() + frame;

        let publish = |controller: &TrackPlayerController<B>| {
            if let Ok(mut info) = playback_info.lock() {
                *info = controller.snapshot();
            }
        };

        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            match rx.recv_timeout(timeout) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    controller.shutdown(Duration::from_millis(fade_out_ms));
                    publish(&controller);
                    break;
                }
                Ok(AudioCmd::TogglePlay(id)) => controller.toggle_play(id),
                Ok(AudioCmd::Seek(to)) => controller.seek(to),
                Ok(AudioCmd::SeekBy(secs)) => controller.seek_by(secs),
                Ok(AudioCmd::SetVisible(visible)) => controller.set_visible(visible),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    controller.shutdown(Duration::ZERO);
                    publish(&controller);
                    break;
                }
            }

            let now = Instant::now();
            if now >= next_tick {
                controller.tick(now);
                next_tick = now + frame;
            }
            publish(&controller);
        }
        log::debug!("audio thread stopped");
    })
}
