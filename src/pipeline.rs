//! Pipeline – ties together logo loading, assembly, footer stamping and PDF
//! rendering into a single function call.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::assembler::DocumentAssembler;
use crate::assets::{load_logo, DefaultLogoSource, LogoSource};
use crate::error::Result;
use crate::fonts::{FontFace, FontManager};
use crate::layout_config::LayoutConfig;
use crate::model::DocumentRequest;
use crate::pagination::{PageGeometry, FOOTER_ZONE_PT, PAGE_MARGIN_PT};
use crate::render::render_pdf;
use crate::sections::notes::DEFAULT_MAX_NOTE_LINES;
use crate::sections::RenderContext;
use crate::style::Theme;

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    /// Portrait mode: height > width (default).
    #[default]
    Portrait,
    /// Landscape mode: width > height.
    Landscape,
}

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// PDF metadata title. `None` derives it from the document kind and
    /// number.
    pub title: Option<String>,
    /// Page width in points (default: A4 = 595.28).
    pub page_width: f32,
    /// Page height in points (default: A4 = 841.89).
    pub page_height: f32,
    /// Page margin in points (default: 40).
    pub page_margin: f32,
    /// Band above the bottom margin reserved for the footer (default: 36).
    pub footer_zone: f32,
    /// Swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
    pub theme: Theme,
    /// Notes input lines kept; the rest are dropped.
    pub max_note_lines: usize,
    /// Timeout of the logo HTTP fetch.
    pub logo_timeout_secs: u64,
    /// Optional TTF replacing builtin Helvetica.
    pub regular_font: Option<PathBuf>,
    /// Optional TTF replacing builtin Helvetica-Bold.
    pub bold_font: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: None,
            page_width: 595.28,
            page_height: 841.89,
            page_margin: PAGE_MARGIN_PT,
            footer_zone: FOOTER_ZONE_PT,
            orientation: PageOrientation::Portrait,
            theme: Theme::default(),
            max_note_lines: DEFAULT_MAX_NOTE_LINES,
            logo_timeout_secs: 5,
            regular_font: None,
            bold_font: None,
        }
    }
}

impl PipelineConfig {
    /// Effective page width after applying orientation.
    pub fn effective_width(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_width,
            PageOrientation::Landscape => self.page_height,
        }
    }

    /// Effective page height after applying orientation.
    pub fn effective_height(&self) -> f32 {
        match self.orientation {
            PageOrientation::Portrait => self.page_height,
            PageOrientation::Landscape => self.page_width,
        }
    }

    /// Create an A4 landscape config.
    pub fn a4_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.effective_width(),
            height: self.effective_height(),
            margin: self.page_margin,
            footer_zone: self.footer_zone,
        }
    }

    /// Read a JSON config; missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn logo_source(&self) -> DefaultLogoSource {
        DefaultLogoSource {
            timeout: Duration::from_secs(self.logo_timeout_secs),
        }
    }
}

/// A finished document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// The frozen layout the bytes were rendered from.
    pub layout: LayoutConfig,
}

/// Builtin Helvetica, or the TTF faces named in `config`.
pub fn load_fonts(config: &PipelineConfig) -> Result<FontManager> {
    let mut fonts = FontManager::new();
    if let Some(path) = &config.regular_font {
        fonts.load_font_file(FontFace::Regular, path)?;
    }
    if let Some(path) = &config.bold_font {
        fonts.load_font_file(FontFace::Bold, path)?;
    }
    Ok(fonts)
}

/// Full pipeline: request → PDF bytes, fetching the logo over HTTP or from
/// disk as configured.
pub fn generate_pdf(request: &DocumentRequest, config: &PipelineConfig) -> Result<RenderedDocument> {
    generate_pdf_with_source(request, config, &config.logo_source())
}

/// Parse a JSON request, then [`generate_pdf`].
pub fn generate_pdf_from_json(json: &str, config: &PipelineConfig) -> Result<RenderedDocument> {
    let request = DocumentRequest::from_json(json)?;
    generate_pdf(&request, config)
}

/// Full pipeline with an explicit logo source.
pub fn generate_pdf_with_source(
    request: &DocumentRequest,
    config: &PipelineConfig,
    source: &dyn LogoSource,
) -> Result<RenderedDocument> {
    let fonts = load_fonts(config)?;
    let layout = assemble(request, config, source, &fonts);
    let bytes = render_pdf(&layout, &fonts)?;
    let page_count = layout.page_count();

    log::info!(
        "{} {}: {} page(s), {} bytes",
        request.kind.title(),
        request.meta.document_number,
        page_count,
        bytes.len()
    );

    Ok(RenderedDocument {
        bytes,
        page_count,
        layout,
    })
}

/// Generate only the layout config (no PDF rendering) – useful for testing.
pub fn compute_layout_config(
    request: &DocumentRequest,
    config: &PipelineConfig,
    source: &dyn LogoSource,
) -> Result<LayoutConfig> {
    let fonts = load_fonts(config)?;
    Ok(assemble(request, config, source, &fonts))
}

fn assemble(
    request: &DocumentRequest,
    config: &PipelineConfig,
    source: &dyn LogoSource,
    fonts: &FontManager,
) -> LayoutConfig {
    let logo = request
        .logo_location()
        .and_then(|location| load_logo(location, source));
    let ctx = RenderContext::new(fonts, &config.theme);
    DocumentAssembler::new(
        request,
        ctx,
        config.geometry(),
        logo.as_ref(),
        config.max_note_lines,
    )
    .with_title(config.title.clone())
    .assemble()
    .layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::NoLogoSource;
    use crate::templates;

    #[test]
    fn pipeline_basic() {
        let doc = generate_pdf_with_source(
            &templates::sample_invoice(),
            &PipelineConfig::default(),
            &NoLogoSource,
        )
        .unwrap();
        assert_eq!(&doc.bytes[0..5], b"%PDF-");
        assert_eq!(doc.page_count, doc.layout.pages.len());
    }

    #[test]
    fn landscape_swaps_geometry() {
        let g = PipelineConfig::a4_landscape().geometry();
        assert_eq!((g.width, g.height), (841.89, 595.28));
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "orientation": "landscape", "max_note_lines": 3 }"#).unwrap();
        assert_eq!(config.orientation, PageOrientation::Landscape);
        assert_eq!(config.max_note_lines, 3);
        assert_eq!(config.page_margin, PAGE_MARGIN_PT);
        assert_eq!(config.logo_timeout_secs, 5);
    }

    #[test]
    fn missing_font_file_is_fatal() {
        let config = PipelineConfig {
            regular_font: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..PipelineConfig::default()
        };
        let err = generate_pdf_with_source(&templates::sample_quote(), &config, &NoLogoSource);
        assert!(matches!(err, Err(crate::error::ForgeError::Font(_))));
    }
}
