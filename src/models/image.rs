use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "21:9")]
    Wide,
    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StylePreset {
    None,
    Anime,
    Photographic,
    DigitalArt,
    ComicBook,
    FantasyArt,
    LineArt,
    AnalogFilm,
    NeonPunk,
    Isometric,
    LowPoly,
    Origami,
    ModelingCompound,
    Cinematic,
    TileTexture,
}

impl StylePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            StylePreset::None => "none",
            StylePreset::Anime => "anime",
            StylePreset::Photographic => "photographic",
            StylePreset::DigitalArt => "digital-art",
            StylePreset::ComicBook => "comic-book",
            StylePreset::FantasyArt => "fantasy-art",
            StylePreset::LineArt => "line-art",
            StylePreset::AnalogFilm => "analog-film",
            StylePreset::NeonPunk => "neon-punk",
            StylePreset::Isometric => "isometric",
            StylePreset::LowPoly => "low-poly",
            StylePreset::Origami => "origami",
            StylePreset::ModelingCompound => "modeling-compound",
            StylePreset::Cinematic => "cinematic",
            StylePreset::TileTexture => "tile-texture",
        }
    }
}

impl std::fmt::Display for StylePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextToImageRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<StylePreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
}

impl TextToImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_style(mut self, style: StylePreset) -> Self {
        self.style_preset = Some(style);
        self
    }
}

/// An in-memory file sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformImageRequest {
    pub prompt: String,
    pub source_image: ImageUpload,
    pub negative_prompt: Option<String>,
    /// 0.0 keeps the source, 1.0 ignores it.
    pub strength: Option<f32>,
    pub style_preset: Option<StylePreset>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InpaintImageRequest {
    pub prompt: String,
    pub source_image: ImageUpload,
    pub mask_image: ImageUpload,
    pub strength: Option<f32>,
    pub mask_blur: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpscaleModel {
    Esrgan,
    RealEsrgan,
    Ldm,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpscaleImageRequest {
    pub image_id: String,
    /// The service accepts 2 or 4.
    pub scale_factor: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<UpscaleModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<StylePreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    pub image_url: String,
    pub image_id: String,
    pub metadata: ImageMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCheck {
    pub is_allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptValidationResponse {
    pub prompt: String,
    pub validation: PromptValidation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_check: Option<ContentCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedPrompt {
    pub original: String,
    pub enhanced: String,
    pub suggested_negative: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOption {
    pub value: StylePreset,
    pub name: String,
}
