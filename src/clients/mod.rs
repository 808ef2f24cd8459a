pub mod cancel;
pub mod image_client;
pub mod suno_client;
pub mod transport;

use crate::{config::ClientConfig, error::Result};

pub use cancel::{CancelHandle, CancelSignal};
pub use image_client::ImageClient;
pub use suno_client::SunoClient;
pub use transport::HttpTransport;

/// Both generation clients behind one value.
#[derive(Clone)]
pub struct StudioClient {
    music_client: SunoClient,
    image_client: ImageClient,
}

impl StudioClient {
    pub fn new(music_config: ClientConfig, image_config: ClientConfig) -> Result<Self> {
        Ok(Self {
            music_client: SunoClient::new(music_config)?,
            image_client: ImageClient::new(image_config)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self {
            music_client: SunoClient::from_env()?,
            image_client: ImageClient::from_env()?,
        })
    }

    pub fn music(&self) -> &SunoClient {
        &self.music_client
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    /// A copy where both clients stop at the same cancel signal.
    pub fn with_cancel(&self, signal: CancelSignal) -> Self {
        Self {
            music_client: self.music_client.with_cancel(signal.clone()),
            image_client: self.image_client.with_cancel(signal),
        }
    }
}
