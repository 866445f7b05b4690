// Application settings
// Read-only JSON configuration loaded at startup

pub mod settings;

pub use settings::{AppSettings, ContentSettings, PlaybackSettings, SpeechSettings};
