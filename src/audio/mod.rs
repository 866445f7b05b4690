// Audio playback module
// Uses Symphonia for decoding, rubato for rate conversion and cpal for output

pub mod decoder;
pub mod output;
pub mod player;
pub mod resample;

pub use player::NativePlayer;
