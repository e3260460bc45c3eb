//! Font metrics and text measurement.
//!
//! Documents are set in the PDF base-14 Helvetica family unless a custom TTF
//! face is loaded. Builtin faces are measured from their AFM advance widths
//! (1/1000 em), custom faces with `ttf-parser` glyph advances, so the width a
//! line is wrapped to is the width it is drawn at.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

/// The three faces the layout uses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
}

/// A loaded TTF/OTF face.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API and for
    /// embedding).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
}

/// Resolves widths for builtin and custom faces.
#[derive(Clone, Default)]
pub struct FontManager {
    custom: HashMap<FontFace, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a TTF/OTF face from bytes, replacing the builtin face for `face`.
    pub fn load_font(&mut self, face: FontFace, bytes: Vec<u8>) -> Result<()> {
        let parsed = ttf_parser::Face::parse(&bytes, 0)
            .map_err(|e| ForgeError::Font(format!("failed to parse {face:?} font: {e}")))?;
        let units_per_em = parsed.units_per_em() as f32;
        self.custom.insert(face, FontData { bytes, units_per_em });
        Ok(())
    }

    pub fn load_font_file(&mut self, face: FontFace, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| {
            ForgeError::Font(format!("cannot read font '{}': {e}", path.display()))
        })?;
        self.load_font(face, bytes)
    }

    /// Font bytes for embedding, `None` when the builtin face is used.
    pub fn font_bytes(&self, face: FontFace) -> Option<&[u8]> {
        self.custom.get(&face).map(|d| d.bytes.as_slice())
    }

    /// Width of `text` in points at `font_size`.
    pub fn measure_text_width(&self, text: &str, font_size: f32, face: FontFace) -> f32 {
        if let Some(data) = self.custom.get(&face) {
            if let Ok(parsed) = ttf_parser::Face::parse(&data.bytes, 0) {
                let scale = font_size / data.units_per_em;
                return text
                    .chars()
                    .map(|ch| match parsed.glyph_index(ch) {
                        Some(gid) => parsed.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => font_size * 0.5,
                    })
                    .sum();
            }
        }

        let units: u32 = text.chars().map(|ch| builtin_advance(ch, face)).sum();
        units as f32 * font_size / 1000.0
    }
}

/// Helvetica advance widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    278, 278, 584, 584, 584, 556, 1015,
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    278, 278, 278, 469, 556, 333,
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for U+0020..=U+007E.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

fn builtin_advance(ch: char, face: FontFace) -> u32 {
    let bold = face == FontFace::Bold;
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    let ch = fold_accent(ch);
    let code = ch as u32;
    if (0x20..=0x7E).contains(&code) {
        return table[(code - 0x20) as usize] as u32;
    }
    match ch {
        '\u{00A0}' => 278,
        '€' | '«' | '»' | '–' => 556,
        '°' => 400,
        '²' | '³' => 333,
        '’' | '‘' => if bold { 278 } else { 222 },
        '…' | '—' | 'Œ' => 1000,
        'œ' => 944,
        '•' => 350,
        'ß' => 611,
        _ => 556,
    }
}

/// Latin-1 accented letters share the advance of their base letter.
fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

/// Greedy word-wrap of `text` into lines no wider than `max_width`.
///
/// Whitespace is normalised: words are split on any whitespace and re-joined
/// with single spaces. A word wider than `max_width` on its own is placed
/// alone on its line, never hyphenated or cut. Blank input yields no lines.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    face: FontFace,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let candidate = if current_line.is_empty() {
            word.to_string()
        } else {
            format!("{current_line} {word}")
        };
        let w = fonts.measure_text_width(&candidate, font_size, face);
        if w > max_width && !current_line.is_empty() {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
        } else {
            current_line = candidate;
        }
    }
    if !current_line.is_empty() {
        lines.push(current_line);
    }
    lines
}

/// Split on `\n`, then [`wrap_text`] each paragraph. Blank paragraphs are
/// dropped.
pub fn wrap_paragraphs(
    text: &str,
    font_size: f32,
    face: FontFace,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    text.split('\n')
        .flat_map(|paragraph| wrap_text(paragraph, font_size, face, max_width, fonts))
        .collect()
}

/// Single-line fit: cut `text` and append `...` until it fits `max_width`.
pub fn truncate_to_width(
    text: &str,
    font_size: f32,
    face: FontFace,
    max_width: f32,
    fonts: &FontManager,
) -> String {
    if fonts.measure_text_width(text, font_size, face) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate = format!("{}...", chars.iter().collect::<String>().trim_end());
        if fonts.measure_text_width(&candidate, font_size, face) <= max_width {
            return candidate;
        }
    }
    "...".to_string()
}

/// Cap `text` at `max_chars` characters, ellipsis included.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_text_width() {
        let mgr = FontManager::default();
        // H(722) e(556) l(222) l(222) o(556) = 2278 units
        let w = mgr.measure_text_width("Hello", 10.0, FontFace::Regular);
        assert!((w - 22.78).abs() < 0.01);
        let bold = mgr.measure_text_width("Hello", 10.0, FontFace::Bold);
        assert!(bold > w);
    }

    #[test]
    fn accented_letters_measure_like_base_letters() {
        let mgr = FontManager::default();
        let a = mgr.measure_text_width("Electricite", 9.0, FontFace::Regular);
        let b = mgr.measure_text_width("Électricité", 9.0, FontFace::Regular);
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn word_wrap_basic() {
        let mgr = FontManager::default();
        let lines = wrap_text("Hello world foo bar", 16.0, FontFace::Regular, 60.0, &mgr);
        assert!(lines.len() >= 2, "Expected wrapping, got {:?}", lines);
        for line in &lines {
            let w = mgr.measure_text_width(line, 16.0, FontFace::Regular);
            assert!(w <= 60.0 || !line.contains(' '), "line {line:?} too wide");
        }
    }

    #[test]
    fn wrap_preserves_normalised_text() {
        let mgr = FontManager::default();
        let text = "  Remplacement   du ballon d'eau chaude\tet \n raccordement  ";
        let lines = wrap_text(text, 9.0, FontFace::Regular, 70.0, &mgr);
        let normalised: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(lines.join(" "), normalised.join(" "));
    }

    #[test]
    fn oversized_word_sits_alone() {
        let mgr = FontManager::default();
        let lines = wrap_text(
            "a Anticonstitutionnellement b",
            10.0,
            FontFace::Regular,
            30.0,
            &mgr,
        );
        assert_eq!(lines, vec!["a", "Anticonstitutionnellement", "b"]);
    }

    #[test]
    fn blank_input_has_no_lines() {
        let mgr = FontManager::default();
        assert!(wrap_text("   ", 10.0, FontFace::Regular, 100.0, &mgr).is_empty());
    }

    #[test]
    fn paragraphs_split_on_newlines() {
        let mgr = FontManager::default();
        let lines = wrap_paragraphs("Ligne 1\nLigne 2\n\nLigne 3", 8.0, FontFace::Regular, 300.0, &mgr);
        assert_eq!(lines, vec!["Ligne 1", "Ligne 2", "Ligne 3"]);
    }

    #[test]
    fn truncation_fits_width() {
        let mgr = FontManager::default();
        let out = truncate_to_width(
            "Fourniture et pose d'un mitigeur thermostatique",
            10.0,
            FontFace::Bold,
            80.0,
            &mgr,
        );
        assert!(out.ends_with("..."));
        assert!(mgr.measure_text_width(&out, 10.0, FontFace::Bold) <= 80.0);
        assert_eq!(truncate_to_width("Court", 10.0, FontFace::Bold, 80.0, &mgr), "Court");
    }

    #[test]
    fn char_truncation() {
        assert_eq!(truncate_chars("12 rue de la Paix", 40), "12 rue de la Paix");
        assert_eq!(truncate_chars("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let mut mgr = FontManager::new();
        assert!(mgr.load_font(FontFace::Regular, vec![0, 1, 2, 3]).is_err());
        assert!(mgr.font_bytes(FontFace::Regular).is_none());
    }
}
