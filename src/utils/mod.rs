pub mod formatting;
pub mod validation;

pub use formatting::{format_created_at, format_duration, format_file_size, format_track_title};
pub use validation::{validate_audio_url, validate_prompt, validate_style, validate_task_id};
