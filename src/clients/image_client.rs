use reqwest::multipart::{Form, Part};

use crate::{
    clients::{cancel::CancelSignal, transport::ApiRequest, HttpTransport},
    config::ClientConfig,
    error::Result,
    models::image::{
        EnhancedPrompt, ImageGenerationResponse, ImageSize, ImageUpload, InpaintImageRequest,
        PromptValidationResponse, StyleOption, StylePreset, TextToImageRequest,
        TransformImageRequest, UpscaleImageRequest,
    },
};

pub const DEFAULT_IMAGE_API_URL: &str = "http://localhost:8000";
const IMAGES: &str = "api/v1/images";
const DEFAULT_HISTORY_LIMIT: u32 = 10;

/// Client for the image-generation service.
#[derive(Clone)]
pub struct ImageClient {
    transport: HttpTransport,
}

impl ImageClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    /// Reads `IMAGE_API_*`; the URL falls back to a local development server.
    pub fn from_env() -> Result<Self> {
        let mut config = ClientConfig::from_env("IMAGE");
        if config.base_url.is_none() {
            config.base_url = Some(DEFAULT_IMAGE_API_URL.to_string());
        }
        Self::new(config)
    }

    pub fn with_cancel(&self, signal: CancelSignal) -> Self {
        Self {
            transport: self.transport.with_cancel(signal),
        }
    }

    pub fn transport(&self) -> &HttpTransport {
        &self.transport
    }

    pub async fn generate_image(
        &self,
        request: &TextToImageRequest,
    ) -> Result<ImageGenerationResponse> {
        log::info!("Generating image ({:?})", request.style_preset);
        self.transport
            .send(ApiRequest::post(endpoint("generate")).json(request)?)
            .await
    }

    /// Image-to-image: re-render an uploaded picture guided by a prompt.
    pub async fn transform_image(
        &self,
        request: TransformImageRequest,
    ) -> Result<ImageGenerationResponse> {
        let mut form = Form::new()
            .text("prompt", request.prompt)
            .part("source_image", file_part(request.source_image));

        if let Some(negative_prompt) = request.negative_prompt {
            form = form.text("negative_prompt", negative_prompt);
        }
        if let Some(strength) = request.strength {
            form = form.text("strength", strength.to_string());
        }
        if let Some(style_preset) = request.style_preset {
            form = form.text("style_preset", style_preset.as_str());
        }

        self.transport
            .send(ApiRequest::post(endpoint("transform")).multipart(form))
            .await
    }

    pub async fn inpaint_image(
        &self,
        request: InpaintImageRequest,
    ) -> Result<ImageGenerationResponse> {
        let mut form = Form::new()
            .text("prompt", request.prompt)
            .part("source_image", file_part(request.source_image))
            .part("mask_image", file_part(request.mask_image));

        if let Some(strength) = request.strength {
            form = form.text("strength", strength.to_string());
        }
        if let Some(mask_blur) = request.mask_blur {
            form = form.text("mask_blur", mask_blur.to_string());
        }

        self.transport
            .send(ApiRequest::post(endpoint("inpaint")).multipart(form))
            .await
    }

    pub async fn upscale_image(
        &self,
        request: &UpscaleImageRequest,
    ) -> Result<ImageGenerationResponse> {
        self.transport
            .send(ApiRequest::post(endpoint("upscale")).json(request)?)
            .await
    }

    pub async fn validate_prompt(&self, prompt: &str) -> Result<PromptValidationResponse> {
        self.transport
            .send(ApiRequest::post(endpoint("validate-prompt")).query("prompt", prompt))
            .await
    }

    pub async fn enhance_prompt(
        &self,
        prompt: &str,
        style_preset: Option<StylePreset>,
    ) -> Result<EnhancedPrompt> {
        let request = ApiRequest::post(endpoint("enhance-prompt"))
            .query("prompt", prompt)
            .query_opt("style_preset", style_preset.map(|s| s.as_str()));

        self.transport.send(request).await
    }

    pub async fn get_preset_sizes(&self) -> Result<Vec<ImageSize>> {
        self.transport.send(ApiRequest::get(endpoint("sizes"))).await
    }

    pub async fn get_style_presets(&self) -> Result<Vec<StyleOption>> {
        self.transport.send(ApiRequest::get(endpoint("styles"))).await
    }

    /// Most recent generations for a user; `limit` defaults to 10.
    pub async fn get_generation_history(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ImageGenerationResponse>> {
        let request = ApiRequest::get(endpoint("history"))
            .query("user_id", user_id)
            .query("limit", limit.unwrap_or(DEFAULT_HISTORY_LIMIT));

        self.transport.send(request).await
    }

    pub async fn delete_image(&self, image_id: &str) -> Result<()> {
        log::info!("Deleting image {}", image_id);
        self.transport
            .send_empty(ApiRequest::delete(IMAGES).segment(image_id))
            .await
    }
}

fn endpoint(path: &str) -> String {
    format!("{}/{}", IMAGES, path)
}

fn file_part(upload: ImageUpload) -> Part {
    Part::bytes(upload.bytes).file_name(upload.file_name)
}
