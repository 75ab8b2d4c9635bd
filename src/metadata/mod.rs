//! Valossa Core metadata documents: types and loading.

mod reader;
mod types;

pub use types::*;

/// Detection type of individual faces.
pub const HUMAN_FACE: &str = "human.face";
/// Detection type of face groups.
pub const HUMAN_FACE_GROUP: &str = "human.face_group";
/// Detection type of general visual concepts.
pub const VISUAL_CONTEXT: &str = "visual.context";
/// Detection type of transcribed speech.
pub const AUDIO_SPEECH: &str = "audio.speech";

/// Ordering key for detection IDs: numeric IDs first in numeric order, then
/// any non-numeric IDs in string order.
pub fn detection_id_key(id: &str) -> (u64, &str) {
    match id.parse::<u64>() {
        Ok(n) => (n, ""),
        Err(_) => (u64::MAX, id),
    }
}

/// Format whole seconds as `HH:MM:SS`.
pub fn seconds_to_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
