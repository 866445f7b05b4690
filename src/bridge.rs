// Bridge between the session and the webview
//
// The webview owns the speech engine (Web Speech API) and renders the
// session view; this module pushes both across as Tauri events.
use parking_lot::Mutex;
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use tauri::{AppHandle, Emitter};

use crate::session::SessionView;
use crate::speech::{SpeechSynth, Utterance, Voice};
use crate::state::DesktopSession;
use crate::transport::SourceEvent;

pub const VIEW_EVENT: &str = "session://view";
pub const SPEAK_EVENT: &str = "speech://speak";
pub const CANCEL_EVENT: &str = "speech://cancel";

/// Speech capability backed by the webview's speech synthesis
#[derive(Clone)]
pub struct WebviewSpeech {
    app: AppHandle,
    voices: Arc<Mutex<Vec<Voice>>>,
}

impl WebviewSpeech {
    pub fn new(app: AppHandle) -> Self {
        Self {
            app,
            voices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Called when the webview reports its voice list
    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock() = voices;
    }
}

impl SpeechSynth for WebviewSpeech {
    fn speak(&mut self, utterance: &Utterance) {
        if let Err(e) = self.app.emit(SPEAK_EVENT, utterance.clone()) {
            log::warn!("[Speech] Failed to reach webview: {}", e);
        }
    }

    fn cancel_active(&mut self) {
        if let Err(e) = self.app.emit(CANCEL_EVENT, ()) {
            log::warn!("[Speech] Failed to reach webview: {}", e);
        }
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.lock().clone()
    }
}

pub fn emit_view(app: &AppHandle, view: &SessionView) {
    if let Err(e) = app.emit(VIEW_EVENT, view.clone()) {
        log::warn!("[Session] Failed to emit view: {}", e);
    }
}

/// Apply playback events to the session as they arrive and push the new view
pub fn spawn_event_pump(
    app: AppHandle,
    session: Arc<Mutex<DesktopSession>>,
    events: Receiver<SourceEvent>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("listenup-events".to_string())
        .spawn(move || {
            for event in events {
                let view = {
                    let mut session = session.lock();
                    if !session.apply_event(event) {
                        continue;
                    }
                    session.view()
                };
                emit_view(&app, &view);
            }
            log::debug!("[Session] Playback event channel closed");
        })
}
