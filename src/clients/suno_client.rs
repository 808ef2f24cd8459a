use crate::{
    clients::{cancel::CancelSignal, transport::ApiRequest, HttpTransport},
    config::ClientConfig,
    error::Result,
    models::music::{
        AccountInfo, AudioAction, CustomAudioPayload, CustomMusicRequest, ExtendMusicRequest,
        GenerateAudioPayload, GenerationResponse, LyricsPayload, LyricsRequest, LyricsResponse,
        MusicCoverRequest, MusicGenerationRequest, StemSeparationRequest,
    },
};

const AUDIOS: &str = "audios";
const LYRICS: &str = "lyrics";
const ACCOUNT: &str = "account";

/// Client for the Suno music-generation API.
///
/// Cheap to clone; clones share the connection pool and configuration.
#[derive(Clone)]
pub struct SunoClient {
    transport: HttpTransport,
}

impl SunoClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env("SUNO"))
    }

    /// A copy whose calls also fail with `cancelled` once `signal` fires.
    pub fn with_cancel(&self, signal: CancelSignal) -> Self {
        Self {
            transport: self.transport.with_cancel(signal),
        }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    /// Generate music from a text prompt.
    pub async fn generate_music(
        &self,
        request: &MusicGenerationRequest,
    ) -> Result<GenerationResponse> {
        let model = request.model.unwrap_or_default();
        log::info!("Generating music with model: {}", model.as_str());

        let payload = GenerateAudioPayload {
            prompt: &request.prompt,
            style: request.style.as_deref(),
            model,
            instrumental: request.instrumental.unwrap_or(false),
            callback_url: request.callback_url.as_deref(),
        };

        self.transport
            .send(ApiRequest::post(AUDIOS).json(&payload)?)
            .await
    }

    /// Generate music from caller-supplied lyrics.
    pub async fn generate_custom_music(
        &self,
        request: &CustomMusicRequest,
    ) -> Result<GenerationResponse> {
        let model = request.model.unwrap_or_default();
        log::info!("Generating custom music '{}' with model: {}", request.title, model.as_str());

        let payload = CustomAudioPayload {
            custom: true,
            lyric: &request.lyrics,
            title: &request.title,
            style: request.style.as_deref(),
            model,
            callback_url: request.callback_url.as_deref(),
        };

        self.transport
            .send(ApiRequest::post(AUDIOS).json(&payload)?)
            .await
    }

    pub async fn get_generation_status(&self, task_id: &str) -> Result<GenerationResponse> {
        self.transport
            .send(ApiRequest::get(AUDIOS).query("generation_id", task_id))
            .await
    }

    pub async fn extend_music(&self, request: &ExtendMusicRequest) -> Result<GenerationResponse> {
        let action = AudioAction::Extend {
            audio_id: &request.audio_id,
            continue_at: request.continue_at,
            lyrics: request.lyrics.as_deref(),
            style: request.style.as_deref(),
            model: request.model.unwrap_or_default(),
        };
        self.post_action(&action).await
    }

    pub async fn create_music_cover(
        &self,
        request: &MusicCoverRequest,
    ) -> Result<GenerationResponse> {
        let action = AudioAction::Cover {
            audio_id: &request.audio_id,
            lyric: &request.lyrics,
            style: &request.style,
            model: request.model.unwrap_or_default(),
        };
        self.post_action(&action).await
    }

    /// Split a track into vocal and instrumental stems.
    pub async fn separate_stems(
        &self,
        request: &StemSeparationRequest,
    ) -> Result<GenerationResponse> {
        let action = AudioAction::Stems {
            audio_id: &request.audio_id,
        };
        self.post_action(&action).await
    }

    pub async fn generate_lyrics(&self, request: &LyricsRequest) -> Result<LyricsResponse> {
        let payload = LyricsPayload {
            prompt: &request.prompt,
            callback_url: request.callback_url.as_deref(),
        };

        self.transport
            .send(ApiRequest::post(LYRICS).json(&payload)?)
            .await
    }

    /// Remaining credits and usage counters.
    pub async fn get_account_info(&self) -> Result<AccountInfo> {
        self.transport.send(ApiRequest::get(ACCOUNT)).await
    }

    async fn post_action(&self, action: &AudioAction<'_>) -> Result<GenerationResponse> {
        log::debug!("Posting audio action: {:?}", action);
        self.transport
            .send(ApiRequest::post(AUDIOS).json(action)?)
            .await
    }
}
