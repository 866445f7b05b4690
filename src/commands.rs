// Tauri command handlers
use tauri::State;

use crate::content::LessonId;
use crate::error::PlayerError;
use crate::flashcards::CardField;
use crate::session::{Key, Mode, SessionView};
use crate::speech::Voice;
use crate::state::{AppState, DesktopSession};

/// Run `action` against the session and hand back the view to render
fn with_session<F>(state: &State<'_, AppState>, action: F) -> Result<SessionView, String>
where
    F: FnOnce(&mut DesktopSession) -> Result<(), PlayerError>,
{
    let mut session = state.session.lock();
    action(&mut session).map_err(|e| e.to_string())?;
    Ok(session.view())
}

#[tauri::command]
pub fn get_view(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |_| Ok(()))
}

#[tauri::command]
pub fn get_rate_options(state: State<'_, AppState>) -> Vec<f64> {
    state.settings.playback.rate_options.clone()
}

// ===== Navigation =====

#[tauri::command]
pub fn select_mode(mode: Mode, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| s.select_mode(mode))
}

#[tauri::command]
pub fn open_lesson(lesson_id: LessonId, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| s.open_lesson(lesson_id))
}

#[tauri::command]
pub fn back_to_browse(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| s.back_to_browse())
}

#[tauri::command]
pub fn back_to_modes(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| s.back_to_modes())
}

/// `key` is a DOM `KeyboardEvent.key` value; unknown keys are ignored
#[tauri::command]
pub fn key_pressed(key: String, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        if let Some(key) = Key::from_name(&key) {
            s.handle_key(key);
        }
        Ok(())
    })
}

// ===== Transport =====

#[tauri::command]
pub fn toggle_playback(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.toggle_playback();
        Ok(())
    })
}

#[tauri::command]
pub fn restart(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.restart();
        Ok(())
    })
}

#[tauri::command]
pub fn skip_back(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.skip_back();
        Ok(())
    })
}

#[tauri::command]
pub fn skip_forward(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.skip_forward();
        Ok(())
    })
}

#[tauri::command]
pub fn seek_to_fraction(fraction: f64, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.seek_to_fraction(fraction);
        Ok(())
    })
}

#[tauri::command]
pub fn set_rate(rate: f64, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| s.set_rate(rate))
}

#[tauri::command]
pub fn set_loop(enabled: bool, state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.set_loop(enabled);
        Ok(())
    })
}

#[tauri::command]
pub fn mark_section_start(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.mark_section_start();
        Ok(())
    })
}

/// A rejected end shows up as the view's notice rather than a command error
#[tauri::command]
pub fn mark_section_end(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| match s.mark_section_end() {
        Ok(_) | Err(PlayerError::InvalidSectionRange { .. }) => Ok(()),
        Err(e) => Err(e),
    })
}

#[tauri::command]
pub fn toggle_section_repeat(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.toggle_section_repeat();
        Ok(())
    })
}

#[tauri::command]
pub fn clear_section(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.clear_section();
        Ok(())
    })
}

// ===== Flashcards =====

#[tauri::command]
pub fn flip_card(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.flip_card();
        Ok(())
    })
}

#[tauri::command]
pub fn next_card(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.next_card();
        Ok(())
    })
}

#[tauri::command]
pub fn previous_card(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.previous_card();
        Ok(())
    })
}

#[tauri::command]
pub fn shuffle_cards(state: State<'_, AppState>) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.shuffle_cards();
        Ok(())
    })
}

#[tauri::command]
pub fn speak_field(
    field: CardField,
    rate: Option<f32>,
    state: State<'_, AppState>,
) -> Result<SessionView, String> {
    with_session(&state, |s| {
        s.speak_field(field, rate);
        Ok(())
    })
}

// ===== Speech =====

/// The webview's voice list changed (it may load after startup)
#[tauri::command]
pub fn voices_changed(voices: Vec<Voice>, state: State<'_, AppState>) -> Result<SessionView, String> {
    state.speech.set_voices(voices);
    with_session(&state, |s| {
        s.on_voices_changed();
        Ok(())
    })
}
