//! Section renderers.
//!
//! Each renderer draws one part of the document through the shared
//! [`PageFlow`](crate::pagination::PageFlow) and returns with the cursor
//! below what it drew. Renderers never decide page breaks themselves; they
//! ask `ensure_space` for every unit that must stay on one page.

pub mod header;
pub mod legal;
pub mod notes;
pub mod recipient;
pub mod table;
pub mod title;
pub mod totals;

use crate::fonts::{truncate_to_width, wrap_text, FontFace, FontManager};
use crate::layout_config::{BoxRole, LayoutBox, TextContent, TextLine};
use crate::style::{Color, Theme};

/// Space between a section heading and its first line.
pub const HEADING_GAP: f32 = 2.0;

/// Horizontal placement of a text line inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Color,
    pub line_height: f32,
    pub align: Align,
}

impl TextStyle {
    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Fonts and theme shared by every renderer of one document.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub fonts: &'a FontManager,
    pub theme: &'a Theme,
}

impl<'a> RenderContext<'a> {
    pub fn new(fonts: &'a FontManager, theme: &'a Theme) -> Self {
        Self { fonts, theme }
    }

    /// Left-aligned style in the theme's text colour.
    pub fn style(&self, face: FontFace, size: f32) -> TextStyle {
        TextStyle {
            face,
            size,
            color: self.theme.text,
            line_height: self.theme.line_height(size),
            align: Align::Left,
        }
    }

    pub fn body(&self) -> TextStyle {
        self.style(FontFace::Regular, self.theme.body_size)
    }

    pub fn small(&self) -> TextStyle {
        self.style(FontFace::Regular, self.theme.small_size)
    }

    pub fn measure(&self, text: &str, style: &TextStyle) -> f32 {
        self.fonts.measure_text_width(text, style.size, style.face)
    }

    pub fn wrap(&self, text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
        wrap_text(text, style.size, style.face, max_width, self.fonts)
    }

    pub fn fit(&self, text: &str, style: &TextStyle, max_width: f32) -> String {
        truncate_to_width(text, style.size, style.face, max_width, self.fonts)
    }

    /// A box of `width` holding `lines` stacked at the style's line height,
    /// each line offset for the style's alignment.
    pub fn text_box(
        &self,
        role: BoxRole,
        x: f32,
        y: f32,
        width: f32,
        lines: Vec<String>,
        style: &TextStyle,
    ) -> LayoutBox {
        let height = lines.len() as f32 * style.line_height;
        let lines = lines
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let x_offset = match style.align {
                    Align::Left => 0.0,
                    Align::Center => ((width - self.measure(&text, style)) / 2.0).max(0.0),
                    Align::Right => (width - self.measure(&text, style)).max(0.0),
                };
                TextLine {
                    text,
                    x_offset,
                    y_offset: i as f32 * style.line_height,
                }
            })
            .collect();

        let mut lbox = LayoutBox::new(role, x, y, width, height);
        lbox.text = Some(TextContent {
            lines,
            face: style.face,
            font_size: style.size,
            color: style.color.to_array(),
            line_height: style.line_height,
        });
        lbox
    }

    /// Single line, truncated with an ellipsis to fit `width`.
    pub fn line_box(
        &self,
        role: BoxRole,
        x: f32,
        y: f32,
        width: f32,
        text: &str,
        style: &TextStyle,
    ) -> LayoutBox {
        let fitted = self.fit(text, style, width);
        self.text_box(role, x, y, width, vec![fitted], style)
    }
}
