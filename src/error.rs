//! Error type shared by the whole document pipeline.
//!
//! Only fatal conditions are represented here. Degraded conditions (an
//! unreachable logo, oversized notes) are logged and rendering continues.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    /// A document request or pipeline config could not be decoded.
    #[error("invalid request: {0}")]
    Request(#[from] serde_json::Error),

    /// A custom TTF face could not be read or parsed.
    #[error("font error: {0}")]
    Font(String),

    /// A logo that passed sniffing could not be embedded in the PDF.
    #[error("image embedding failed: {0}")]
    Image(String),

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
