pub mod common;
pub mod image;
pub mod music;

pub use common::*;
pub use image::*;
pub use music::{
    AccountInfo, CustomMusicRequest, ExtendMusicRequest, GeneratedLyrics, GenerationResponse,
    GenerationStatus, LyricsRequest, LyricsResponse, MusicCoverRequest, MusicGenerationRequest,
    MusicTrack, StemSeparationRequest, SunoModel, UsageStats,
};
