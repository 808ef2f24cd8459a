//! Caller-side checks run before a request is built. The clients themselves
//! never validate business fields.

use uuid::Uuid;

pub const PROMPT_MIN_CHARS: usize = 3;
pub const PROMPT_MAX_CHARS: usize = 500;
pub const STYLE_MIN_CHARS: usize = 2;
pub const STYLE_MAX_CHARS: usize = 100;

fn trimmed_len_within(value: &str, min: usize, max: usize) -> bool {
    let len = value.trim().chars().count();
    (min..=max).contains(&len)
}

pub fn validate_prompt(prompt: &str) -> bool {
    trimmed_len_within(prompt, PROMPT_MIN_CHARS, PROMPT_MAX_CHARS)
}

pub fn validate_style(style: &str) -> bool {
    trimmed_len_within(style, STYLE_MIN_CHARS, STYLE_MAX_CHARS)
}

pub fn validate_audio_url(url: &str) -> bool {
    match reqwest::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Task ids are hyphenated UUIDs, any case.
pub fn validate_task_id(task_id: &str) -> bool {
    task_id.len() == 36 && Uuid::try_parse(task_id).is_ok()
}
