use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SunoModel {
    #[serde(rename = "chirp-v3.5")]
    V3_5,
    #[default]
    #[serde(rename = "chirp-v4")]
    V4,
    #[serde(rename = "chirp-v4.5")]
    V4_5,
}

impl SunoModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SunoModel::V3_5 => "chirp-v3.5",
            SunoModel::V4 => "chirp-v4",
            SunoModel::V4_5 => "chirp-v4.5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Pending,
    Running,
    Succeeded,
    Error,
    /// Any state string this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl GenerationStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, GenerationStatus::Succeeded | GenerationStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MusicGenerationRequest {
    pub prompt: String,
    pub style: Option<String>,
    pub model: Option<SunoModel>,
    pub instrumental: Option<bool>,
    pub callback_url: Option<String>,
}

impl MusicGenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_model(mut self, model: SunoModel) -> Self {
        self.model = Some(model);
        self
    }

    pub fn instrumental(mut self, instrumental: bool) -> Self {
        self.instrumental = Some(instrumental);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomMusicRequest {
    pub lyrics: String,
    pub title: String,
    pub style: Option<String>,
    pub model: Option<SunoModel>,
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtendMusicRequest {
    pub audio_id: String,
    /// Offset in seconds where the continuation starts.
    pub continue_at: f64,
    pub lyrics: Option<String>,
    pub style: Option<String>,
    pub model: Option<SunoModel>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MusicCoverRequest {
    pub audio_id: String,
    pub lyrics: String,
    pub style: String,
    pub model: Option<SunoModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StemSeparationRequest {
    pub audio_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LyricsRequest {
    pub prompt: String,
    pub callback_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lyric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GenerationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Fields not modelled above (`tags`, `metadata`, ...), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<MusicTrack>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,
}

impl GenerationResponse {
    pub fn tracks(&self) -> &[MusicTrack] {
        self.data.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLyrics {
    pub id: String,
    pub lyrics: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricsResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<GeneratedLyrics>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub music_generations: u64,
    pub lyrics_generations: u64,
    pub audio_processing: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub remaining_credits: u64,
    pub total_credits: u64,
    pub usage_stats: UsageStats,
}

// Wire payloads. Borrowed from the caller's request so nothing is cloned.

#[derive(Debug, Serialize)]
pub(crate) struct GenerateAudioPayload<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a str>,
    pub model: SunoModel,
    pub instrumental: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CustomAudioPayload<'a> {
    pub custom: bool,
    pub lyric: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<&'a str>,
    pub model: SunoModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

/// Follow-up operations on an existing track, discriminated by `action`.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub(crate) enum AudioAction<'a> {
    Extend {
        audio_id: &'a str,
        continue_at: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        lyrics: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<&'a str>,
        model: SunoModel,
    },
    Cover {
        audio_id: &'a str,
        lyric: &'a str,
        style: &'a str,
        model: SunoModel,
    },
    Stems {
        audio_id: &'a str,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct LyricsPayload<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_serializes_to_chirp_names() {
        assert_eq!(serde_json::to_value(SunoModel::V4).unwrap(), json!("chirp-v4"));
        assert_eq!(serde_json::to_value(SunoModel::V3_5).unwrap(), json!("chirp-v3.5"));
        assert_eq!(SunoModel::default(), SunoModel::V4);
        assert_eq!(SunoModel::V4_5.as_str(), "chirp-v4.5");
    }

    #[test]
    fn unknown_state_is_coerced() {
        let track: MusicTrack =
            serde_json::from_value(json!({"id": "t1", "state": "queued"})).unwrap();
        assert_eq!(track.state, Some(GenerationStatus::Unknown));
        assert!(!GenerationStatus::Running.is_finished());
        assert!(GenerationStatus::Error.is_finished());
    }

    #[test]
    fn audio_actions_carry_discriminator() {
        let stems = serde_json::to_value(AudioAction::Stems { audio_id: "a1" }).unwrap();
        assert_eq!(stems, json!({"action": "stems", "audio_id": "a1"}));

        let extend = serde_json::to_value(AudioAction::Extend {
            audio_id: "a1",
            continue_at: 30.5,
            lyrics: None,
            style: Some("rock"),
            model: SunoModel::V4,
        })
        .unwrap();
        assert_eq!(
            extend,
            json!({"action": "extend", "audio_id": "a1", "continue_at": 30.5, "style": "rock", "model": "chirp-v4"})
        );
    }

    #[test]
    fn track_keeps_unmodelled_fields() {
        let body = json!({
            "id": "t1",
            "title": "Night Drive",
            "state": "running",
            "duration": 95.5,
            "tags": "synthwave, retro",
            "metadata": {"prompt": "neon city", "gpt_description_prompt": null}
        });
        let track: MusicTrack = serde_json::from_value(body.clone()).unwrap();

        assert_eq!(track.extra["tags"], "synthwave, retro");
        assert_eq!(track.extra["metadata"]["prompt"], "neon city");
        assert!(!track.extra.contains_key("title"));
        assert_eq!(serde_json::to_value(&track).unwrap(), body);
    }

    #[test]
    fn generation_response_requires_success_flag() {
        assert!(serde_json::from_value::<GenerationResponse>(json!({"task_id": "x"})).is_err());

        let response: GenerationResponse =
            serde_json::from_value(json!({"success": true, "task_id": "abc-123"})).unwrap();
        assert!(response.tracks().is_empty());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "task_id": "abc-123"})
        );
    }
}
