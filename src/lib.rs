// ListenUp - language lesson player
// Module declarations
pub mod content;
pub mod error;
pub mod flashcards;
pub mod format;
pub mod session;
pub mod settings;
pub mod speech;
pub mod transport;

#[cfg(feature = "audio")]
pub mod audio;

#[cfg(feature = "desktop")]
mod bridge;
#[cfg(feature = "desktop")]
mod commands;
#[cfg(feature = "desktop")]
mod state;

pub use content::{ContentStore, Lesson, LessonId, Level, VocabularyEntry};
pub use error::{ContentError, PlayerError};
pub use session::{Key, Mode, Screen, Session, SessionView};
pub use settings::AppSettings;
pub use speech::{SpeechSynth, Utterance, Voice};
pub use transport::{Playback, PlaybackEvent, SourceEvent, UnavailablePlayback};

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use audio::NativePlayer;
    use bridge::WebviewSpeech;
    use state::AppState;
    use std::sync::mpsc;
    use tauri::Manager;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            // Content and audio ship as bundle resources
            let app_dir = app.path().resource_dir()?;
            let settings = AppSettings::load(&app_dir)?;

            let (events_tx, events_rx) = mpsc::channel();
            let player: state::DesktopPlayback = match NativePlayer::new(events_tx.clone()) {
                Ok(player) => Box::new(player),
                Err(e) => {
                    // Vocabulary study still works; lessons show a media notice
                    log::error!("[Audio] {:#}", e);
                    Box::new(UnavailablePlayback::new(events_tx))
                }
            };
            let speech = WebviewSpeech::new(app.handle().clone());

            let session = Session::new(player, speech.clone(), &settings);
            let app_state = AppState::new(session, speech, settings.clone());
            let session = app_state.session.clone();
            app.manage(app_state);

            bridge::spawn_event_pump(app.handle().clone(), session.clone(), events_rx)?;

            // The one async step: read the lesson documents, then go interactive
            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let content = ContentStore::load(&settings.content)
                    .await
                    .map_err(PlayerError::from);
                let view = {
                    let mut session = session.lock();
                    session.finish_loading(content);
                    session.view()
                };
                bridge::emit_view(&handle, &view);
            });

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::get_view,
            commands::get_rate_options,
            commands::select_mode,
            commands::open_lesson,
            commands::back_to_browse,
            commands::back_to_modes,
            commands::key_pressed,
            commands::toggle_playback,
            commands::restart,
            commands::skip_back,
            commands::skip_forward,
            commands::seek_to_fraction,
            commands::set_rate,
            commands::set_loop,
            commands::mark_section_start,
            commands::mark_section_end,
            commands::toggle_section_repeat,
            commands::clear_section,
            commands::flip_card,
            commands::next_card,
            commands::previous_card,
            commands::shuffle_cards,
            commands::speak_field,
            commands::voices_changed,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
