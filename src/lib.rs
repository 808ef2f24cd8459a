//! Async clients for the Suno music-generation API and an image-generation
//! service.
//!
//! Every call sends one authenticated HTTP request, races it against the
//! configured timeout (and an optional [`CancelSignal`]), and either returns
//! the typed response body or a single [`ApiError`].

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod utils;

pub use clients::{CancelHandle, CancelSignal, HttpTransport, ImageClient, StudioClient, SunoClient};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ApiError, ErrorDescriptor, Result};
pub use models::*;
