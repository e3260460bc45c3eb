//! Layout config – the intermediate representation between document layout
//! and PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page; once the footer compositor has run it is never mutated.

use serde::{Deserialize, Serialize};

use crate::fonts::FontFace;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// What part of the document a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoxRole {
    Logo,
    Issuer,
    Recipient,
    Title,
    TableHeader,
    /// One items-table row; `index` is the item's position in the request.
    TableRow { index: usize },
    Totals,
    Legal,
    Notes,
    FooterRule,
    FooterIdentity,
    PageMarker,
    /// Child box inside one of the above.
    Content,
}

/// A positioned rectangle with optional content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutBox {
    pub role: BoxRole,
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub background_color: Option<[f32; 4]>,
    pub border: Option<BorderStyle>,

    pub text: Option<TextContent>,
    pub image: Option<ImageContent>,

    /// Children carry page-absolute coordinates too.
    pub children: Vec<LayoutBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderStyle {
    pub width: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines of text.
    pub lines: Vec<TextLine>,
    pub face: FontFace,
    pub font_size: f32,
    pub color: [f32; 4],
    pub line_height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    /// X offset within the layout box (alignment already applied).
    pub x_offset: f32,
    /// Y offset from the top of the box.
    pub y_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageContent {
    /// `data:` URI holding the decoded-and-accepted logo bytes.
    pub src: String,
    pub width: f32,
    pub height: f32,
}

impl LayoutConfig {
    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl PageLayout {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            boxes: Vec::new(),
        }
    }

    /// Top-level boxes with `role`.
    pub fn boxes_with_role(&self, role: BoxRole) -> impl Iterator<Item = &LayoutBox> {
        self.boxes.iter().filter(move |b| b.role == role)
    }
}

impl LayoutBox {
    pub fn new(role: BoxRole, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            role,
            x,
            y,
            width,
            height,
            background_color: None,
            border: None,
            text: None,
            image: None,
            children: Vec::new(),
        }
    }

    pub fn filled(mut self, color: [f32; 4]) -> Self {
        self.background_color = Some(color);
        self
    }

    pub fn bordered(mut self, width: f32, color: [f32; 4]) -> Self {
        self.border = Some(BorderStyle { width, color });
        self
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// All text lines of this box and its children, in drawing order.
    pub fn text_lines(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .text
            .iter()
            .flat_map(|t| t.lines.iter().map(|l| l.text.as_str()))
            .collect();
        for child in &self.children {
            out.extend(child.text_lines());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip_keeps_roles() {
        let mut page = PageLayout::new(0);
        page.boxes
            .push(LayoutBox::new(BoxRole::TableRow { index: 3 }, 40.0, 100.0, 500.0, 20.0));
        let config = LayoutConfig {
            title: "Facture F-1".into(),
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            pages: vec![page],
        };
        let parsed = LayoutConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed.page_count(), 1);
        assert_eq!(parsed.pages[0].boxes[0].role, BoxRole::TableRow { index: 3 });
    }

    #[test]
    fn text_lines_include_children() {
        let mut parent = LayoutBox::new(BoxRole::Totals, 0.0, 0.0, 10.0, 10.0);
        let mut child = LayoutBox::new(BoxRole::Content, 0.0, 0.0, 10.0, 10.0);
        child.text = Some(TextContent {
            lines: vec![TextLine {
                text: "Total HT".into(),
                x_offset: 0.0,
                y_offset: 0.0,
            }],
            face: FontFace::Regular,
            font_size: 9.0,
            color: [0.0, 0.0, 0.0, 1.0],
            line_height: 12.0,
        });
        parent.children.push(child);
        assert_eq!(parent.text_lines(), vec!["Total HT"]);
    }
}
