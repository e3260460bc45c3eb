//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Text in builtin faces is written as WinAnsi bytes; faces loaded from a
//! TTF are embedded once per document and written through their font id.

use std::collections::{HashMap, HashSet};

use printpdf::*;

use crate::assets::parse_data_uri;
use crate::error::{ForgeError, Result};
use crate::fonts::{FontFace, FontManager};
use crate::layout_config::{LayoutBox, LayoutConfig, TextContent};

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Per-face font used when drawing text.
#[derive(Clone)]
enum FaceFont {
    Builtin(BuiltinFont),
    Embedded(FontId),
}

struct Resources {
    images: HashMap<String, ImageResource>,
    faces: HashMap<FontFace, FaceFont>,
}

/// Render a LayoutConfig into PDF bytes.
///
/// Every image in the layout has already been accepted by the logo loader,
/// so an image that cannot be embedded here fails the whole document.
pub fn render_pdf(config: &LayoutConfig, fonts: &FontManager) -> Result<Vec<u8>> {
    if !(config.page_width_pt > 0.0 && config.page_height_pt > 0.0) {
        return Err(ForgeError::Render(format!(
            "invalid page size {}x{} pt",
            config.page_width_pt, config.page_height_pt
        )));
    }
    let page_w = Mm(config.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(config.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&config.title);

    let resources = Resources {
        images: register_images(&mut doc, config)?,
        faces: register_faces(&mut doc, fonts)?,
    };

    let mut pages: Vec<PdfPage> = config
        .pages
        .iter()
        .map(|page_layout| {
            let mut ops = Vec::new();
            for lbox in &page_layout.boxes {
                render_box(&mut ops, lbox, config.page_height_pt, &resources);
            }
            PdfPage::new(page_w, page_h, ops)
        })
        .collect();

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::debug!("printpdf: {warning:?}");
    }
    Ok(bytes)
}

fn register_images(
    doc: &mut PdfDocument,
    config: &LayoutConfig,
) -> Result<HashMap<String, ImageResource>> {
    let mut all_srcs: HashSet<&str> = HashSet::new();
    for page_layout in &config.pages {
        for lbox in &page_layout.boxes {
            collect_image_srcs(lbox, &mut all_srcs);
        }
    }

    let mut image_resources = HashMap::new();
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();
    for src in all_srcs {
        let (_, bytes) = parse_data_uri(src).map_err(ForgeError::Image)?;

        // Decode with the `image` crate to obtain pixel dimensions.
        let dyn_img = ::image::load_from_memory(&bytes)
            .map_err(|e| ForgeError::Image(format!("decode error: {e}")))?;
        let (px_width, px_height) = (dyn_img.width(), dyn_img.height());

        let raw = RawImage::decode_from_bytes(&bytes, &mut img_warnings)
            .map_err(|e| ForgeError::Image(format!("PDF encode error: {e}")))?;
        let xobj_id = doc.add_image(&raw);

        image_resources.insert(
            src.to_string(),
            ImageResource {
                xobj_id,
                px_width,
                px_height,
            },
        );
    }
    Ok(image_resources)
}

fn register_faces(doc: &mut PdfDocument, fonts: &FontManager) -> Result<HashMap<FontFace, FaceFont>> {
    let mut faces = HashMap::new();
    for (face, builtin) in [
        (FontFace::Regular, BuiltinFont::Helvetica),
        (FontFace::Bold, BuiltinFont::HelveticaBold),
        (FontFace::Italic, BuiltinFont::HelveticaOblique),
    ] {
        let font = match fonts.font_bytes(face) {
            Some(bytes) => {
                let mut warnings = Vec::new();
                let parsed = printpdf::font::ParsedFont::from_bytes(bytes, 0, &mut warnings).ok_or_else(|| {
                    ForgeError::Font(format!("printpdf could not parse the {face:?} font"))
                })?;
                FaceFont::Embedded(doc.add_font(&parsed))
            }
            None => FaceFont::Builtin(builtin),
        };
        faces.insert(face, font);
    }
    Ok(faces)
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{0152}' => 0x8C, // Œ
            '\u{0153}' => 0x9C, // œ
            '\u{00A0}' | '\u{202F}' => 0x20, // (narrow) no-break space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0x9F range; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

/// Recursively collect all unique `image.src` strings from a [`LayoutBox`] tree.
fn collect_image_srcs<'a>(lbox: &'a LayoutBox, srcs: &mut HashSet<&'a str>) {
    if let Some(img) = &lbox.image {
        srcs.insert(img.src.as_str());
    }
    for child in &lbox.children {
        collect_image_srcs(child, srcs);
    }
}

fn rgb(c: &[f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
        icc_profile: None,
    })
}

/// Corners of a rectangle in PDF coordinates, counter-clockwise from the
/// bottom-left.
fn corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Vec<LinePoint> {
    [(x1, y1), (x2, y1), (x2, y2), (x1, y2)]
        .into_iter()
        .map(|(x, y)| LinePoint {
            p: Point { x: Pt(x), y: Pt(y) },
            bezier: false,
        })
        .collect()
}

/// Recursively render a LayoutBox and its children into PDF ops.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32, res: &Resources) {
    // PDF origin is bottom-left; layout origin is top-left.
    let top = page_height - lbox.y;
    let bottom = top - lbox.height;
    let right = lbox.x + lbox.width;

    if let Some(bg) = &lbox.background_color {
        ops.push(Op::SetFillColor { col: rgb(bg) });
        ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: corners(lbox.x, bottom, right, top),
                }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    if let Some(border) = &lbox.border {
        ops.push(Op::SetOutlineColor {
            col: rgb(&border.color),
        });
        ops.push(Op::SetOutlineThickness {
            pt: Pt(border.width),
        });
        ops.push(Op::DrawLine {
            line: Line {
                points: corners(lbox.x, bottom, right, top),
                is_closed: true,
            },
        });
    }

    if let Some(text) = &lbox.text {
        render_text(ops, lbox.x, top, text, res);
    }

    if let Some(img) = &lbox.image {
        if let Some(image) = res.images.get(&img.src) {
            // At dpi=72 printpdf renders 1 px = 1 pt, so
            // scale = desired_pt / px_dim.
            let scale = |want: f32, px: u32| if px > 0 { want / px as f32 } else { 1.0 };
            ops.push(Op::UseXobject {
                id: image.xobj_id.clone(),
                transform: XObjectTransform {
                    translate_x: Some(Pt(lbox.x)),
                    translate_y: Some(Pt(top - img.height)),
                    dpi: Some(72.0),
                    scale_x: Some(scale(img.width, image.px_width)),
                    scale_y: Some(scale(img.height, image.px_height)),
                    rotate: None,
                },
            });
        }
    }

    for child in &lbox.children {
        render_box(ops, child, page_height, res);
    }
}

fn render_text(ops: &mut Vec<Op>, x: f32, top: f32, text: &TextContent, res: &Resources) {
    let font = res
        .faces
        .get(&text.face)
        .cloned()
        .unwrap_or(FaceFont::Builtin(BuiltinFont::Helvetica));

    for tline in &text.lines {
        if tline.text.is_empty() {
            continue;
        }
        // Baseline ≈ top of line + ascender (approx 0.75 × font_size)
        let baseline = top - tline.y_offset - text.font_size * 0.75;

        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x + tline.x_offset),
                y: Pt(baseline),
            },
        });
        ops.push(Op::SetFillColor {
            col: rgb(&text.color),
        });
        match &font {
            FaceFont::Builtin(builtin) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(text.font_size),
                    font: *builtin,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_winlatin(&tline.text))],
                    font: *builtin,
                });
            }
            FaceFont::Embedded(id) => {
                ops.push(Op::SetFontSize {
                    size: Pt(text.font_size),
                    font: id.clone(),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(tline.text.clone())],
                    font: id.clone(),
                });
            }
        }
        ops.push(Op::EndTextSection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{BoxRole, ImageContent, PageLayout};

    fn empty(pages: usize) -> LayoutConfig {
        LayoutConfig {
            title: "Test".into(),
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: (0..pages).map(PageLayout::new).collect(),
        }
    }

    #[test]
    fn render_empty_page() {
        let bytes = render_pdf(&empty(0), &FontManager::new()).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn winlatin_maps_euro_and_accents() {
        let s = to_winlatin("é 5 €");
        assert_eq!(s.as_bytes(), &[0xE9, b' ', b'5', b' ', 0x80]);
    }

    #[test]
    fn undecodable_image_fails_the_document() {
        let mut config = empty(1);
        let mut lbox = LayoutBox::new(BoxRole::Logo, 40.0, 40.0, 50.0, 50.0);
        lbox.image = Some(ImageContent {
            src: "data:image/png;base64,iVBORw0KGgo=".into(),
            width: 50.0,
            height: 50.0,
        });
        config.pages[0].boxes.push(lbox);
        let err = render_pdf(&config, &FontManager::new());
        assert!(matches!(err, Err(ForgeError::Image(_))));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = empty(1);
        config.page_height_pt = 0.0;
        assert!(matches!(
            render_pdf(&config, &FontManager::new()),
            Err(ForgeError::Render(_))
        ));
    }
}
