use crate::app::App;
use crate::audio::PlaybackInfo;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App, info: &PlaybackInfo) {
    let track = info.active.and_then(|id| app.catalog.get(id));
    mpris.set_track_metadata(track, Some(info.duration));
    mpris.set_playback(app.playback);
}
