// Application state management
use parking_lot::Mutex;
use std::sync::Arc;

use crate::bridge::WebviewSpeech;
use crate::session::Session;
use crate::settings::AppSettings;
use crate::transport::Playback;

/// Native player, or a stand-in when there is no output device
pub type DesktopPlayback = Box<dyn Playback + Send>;

pub type DesktopSession = Session<DesktopPlayback, WebviewSpeech>;

pub struct AppState {
    pub session: Arc<Mutex<DesktopSession>>,
    pub speech: WebviewSpeech,
    pub settings: AppSettings,
}

impl AppState {
    pub fn new(session: DesktopSession, speech: WebviewSpeech, settings: AppSettings) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            speech,
            settings,
        }
    }
}
