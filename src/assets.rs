//! Issuer logo loading.
//!
//! The logo is the only external asset a document uses and the only step
//! allowed to fail softly: any fetch, sniff or decode problem is logged and
//! the header falls back to text only.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64_STD, Engine as _};
use image::ImageFormat;

/// Formats a logo may be embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    Png,
    Jpeg,
}

impl LogoFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            LogoFormat::Png => ImageFormat::Png,
            LogoFormat::Jpeg => ImageFormat::Jpeg,
        }
    }

    fn mime(self) -> &'static str {
        match self {
            LogoFormat::Png => "image/png",
            LogoFormat::Jpeg => "image/jpeg",
        }
    }

    fn other(self) -> Self {
        match self {
            LogoFormat::Png => LogoFormat::Jpeg,
            LogoFormat::Jpeg => LogoFormat::Png,
        }
    }
}

/// A logo that decoded successfully.
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub format: LogoFormat,
    pub bytes: Vec<u8>,
    pub px_width: u32,
    pub px_height: u32,
}

impl LogoImage {
    /// Size in points that fits `max_width × max_height`, keeping the aspect
    /// ratio. Never upscales past 1 px = 1 pt.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        if self.px_width == 0 || self.px_height == 0 {
            return (0.0, 0.0);
        }
        let (w, h) = (self.px_width as f32, self.px_height as f32);
        let scale = (max_width / w).min(max_height / h).min(1.0);
        (w * scale, h * scale)
    }

    /// The logo as a `data:` URI, the form images travel in through the
    /// layout IR.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime(),
            BASE64_STD.encode(&self.bytes)
        )
    }
}

/// Raw bytes returned by a [`LogoSource`].
#[derive(Debug, Clone)]
pub struct FetchedAsset {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Where logo bytes come from. Errors are plain messages: the caller only
/// logs them.
pub trait LogoSource {
    fn fetch(&self, location: &str) -> Result<FetchedAsset, String>;
}

/// Fetches `http(s)://` locations over the network and anything else from
/// the local filesystem.
#[derive(Debug, Clone)]
pub struct DefaultLogoSource {
    pub timeout: Duration,
}

impl Default for DefaultLogoSource {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl LogoSource for DefaultLogoSource {
    fn fetch(&self, location: &str) -> Result<FetchedAsset, String> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let client = reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| format!("HTTP client error: {e}"))?;
            let response = client
                .get(location)
                .send()
                .map_err(|e| format!("request failed: {e}"))?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("HTTP {status}"));
            }
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response
                .bytes()
                .map_err(|e| format!("body read failed: {e}"))?;
            Ok(FetchedAsset {
                bytes: bytes.to_vec(),
                content_type,
            })
        } else {
            let bytes = std::fs::read(location).map_err(|e| format!("cannot read file: {e}"))?;
            Ok(FetchedAsset {
                bytes,
                content_type: None,
            })
        }
    }
}

/// Never fetches anything; `data:` URIs still resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogoSource;

impl LogoSource for NoLogoSource {
    fn fetch(&self, _location: &str) -> Result<FetchedAsset, String> {
        Err("remote logos disabled".to_string())
    }
}

/// Resolve `location` to a decoded logo, or `None` when anything fails.
pub fn load_logo(location: &str, source: &dyn LogoSource) -> Option<LogoImage> {
    let fetched = if location.starts_with("data:") {
        parse_data_uri(location).map(|(mime, bytes)| FetchedAsset {
            bytes,
            content_type: Some(mime),
        })
    } else {
        source.fetch(location)
    };

    match fetched {
        Ok(asset) => {
            let logo = decode_logo(asset.bytes, asset.content_type.as_deref());
            if logo.is_none() {
                log::warn!("Logo '{}' is neither PNG nor JPEG; rendering without it", preview(location));
            }
            logo
        }
        Err(e) => {
            log::warn!("Logo '{}' unavailable ({e}); rendering without it", preview(location));
            None
        }
    }
}

/// Decode `bytes` in the sniffed format, then in the other one.
pub fn decode_logo(bytes: Vec<u8>, content_type: Option<&str>) -> Option<LogoImage> {
    let first = sniff(content_type, &bytes).unwrap_or(LogoFormat::Png);
    for format in [first, first.other()] {
        match image::load_from_memory_with_format(&bytes, format.image_format()) {
            Ok(img) => {
                return Some(LogoImage {
                    format,
                    px_width: img.width(),
                    px_height: img.height(),
                    bytes,
                });
            }
            Err(e) => log::debug!("Logo is not a valid {format:?}: {e}"),
        }
    }
    None
}

/// Content type first, magic bytes second.
fn sniff(content_type: Option<&str>, bytes: &[u8]) -> Option<LogoFormat> {
    if let Some(ct) = content_type {
        let ct = ct.to_ascii_lowercase();
        if ct.contains("png") {
            return Some(LogoFormat::Png);
        }
        if ct.contains("jpeg") || ct.contains("jpg") {
            return Some(LogoFormat::Jpeg);
        }
    }
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some(LogoFormat::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(LogoFormat::Jpeg)
    } else {
        None
    }
}

/// Parse a `data:<mime>;base64,<data>` URI into its mime type and bytes.
pub(crate) fn parse_data_uri(src: &str) -> Result<(String, Vec<u8>), String> {
    let rest = src
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let comma_pos = rest.find(',').ok_or_else(|| {
        "Invalid data URI: missing `,` separator between header and data".to_string()
    })?;
    let header = &rest[..comma_pos];
    if !header.contains(";base64") {
        return Err("Only base64-encoded data URIs are supported".to_string());
    }
    let mime = header.split(';').next().unwrap_or_default().to_string();
    let b64_data = rest[comma_pos + 1..].trim();
    let bytes = BASE64_STD
        .decode(b64_data)
        .map_err(|e| format!("Base64 decode error: {e}"))?;
    Ok((mime, bytes))
}

fn preview(location: &str) -> &str {
    match location.char_indices().nth(80) {
        Some((idx, _)) => &location[..idx],
        None => location,
    }
}
