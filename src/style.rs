//! Styling constants – colours, type sizes and row metrics shared by every
//! section renderer. A [`Theme`] is plain data so it can be overridden from a
//! JSON config file.

use serde::{Deserialize, Serialize};

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self::rgb8(r, g, b))
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            Some(Self::rgb8(r, g, b))
        } else {
            None
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Visual constants of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    // Colours
    /// Title, table header fill, recipient accent bar, highlighted total.
    pub accent: Color,
    /// Text drawn on top of `accent`.
    pub on_accent: Color,
    pub text: Color,
    pub muted: Color,
    /// Fill of every other items-table row.
    pub row_shade: Color,
    /// Recipient box and totals panel fill.
    pub panel_shade: Color,
    pub rule: Color,

    // Type sizes (pt)
    pub issuer_name_size: f32,
    pub title_size: f32,
    pub body_size: f32,
    pub small_size: f32,
    pub footer_size: f32,
    /// Line advance as a multiple of the font size.
    pub line_height_factor: f32,

    // Items table
    pub header_row_height: f32,
    /// Height of a row without description lines.
    pub base_row_height: f32,
    /// Added per wrapped description line.
    pub description_line_height: f32,
    pub cell_padding: f32,

    // Header / recipient
    pub logo_max_width: f32,
    pub logo_max_height: f32,
    pub recipient_box_width: f32,
    pub recipient_box_height: f32,
    pub recipient_accent_width: f32,
    /// Character budget of the recipient address line.
    pub recipient_address_chars: usize,

    pub totals_width: f32,
    pub totals_row_height: f32,
    /// Vertical gap between sections.
    pub section_gap: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::rgb8(0x1e, 0x3a, 0x5f),
            on_accent: Color::WHITE,
            text: Color::rgb8(0x1f, 0x29, 0x37),
            muted: Color::rgb8(0x6b, 0x72, 0x80),
            row_shade: Color::rgb8(0xf3, 0xf4, 0xf6),
            panel_shade: Color::rgb8(0xee, 0xf2, 0xf7),
            rule: Color::rgb8(0xd1, 0xd5, 0xdb),

            issuer_name_size: 15.0,
            title_size: 18.0,
            body_size: 9.0,
            small_size: 8.0,
            footer_size: 7.0,
            line_height_factor: 1.35,

            header_row_height: 20.0,
            base_row_height: 20.0,
            description_line_height: 11.0,
            cell_padding: 5.0,

            logo_max_width: 110.0,
            logo_max_height: 55.0,
            recipient_box_width: 230.0,
            recipient_box_height: 88.0,
            recipient_accent_width: 4.0,
            recipient_address_chars: 48,

            totals_width: 220.0,
            totals_row_height: 18.0,
            section_gap: 16.0,
        }
    }
}

impl Theme {
    pub fn line_height(&self, font_size: f32) -> f32 {
        font_size * self.line_height_factor
    }
}
