//! Free-text notes block.

use crate::fonts::FontFace;
use crate::layout_config::BoxRole;
use crate::pagination::PageFlow;

use super::{RenderContext, HEADING_GAP};

/// Default cap on input lines; anything past it is dropped.
pub const DEFAULT_MAX_NOTE_LINES: usize = 15;

/// Splits `notes` on newlines, keeps the first `max_lines` input lines and
/// word-wraps each. Blank input lines become vertical spacers.
pub fn render_notes(flow: &mut PageFlow, ctx: &RenderContext, notes: &str, max_lines: usize) {
    let theme = ctx.theme;
    let x = flow.left();
    let width = flow.content_width();

    let input: Vec<&str> = notes.lines().collect();
    if input.len() > max_lines {
        log::warn!(
            "notes truncated to {max_lines} lines ({} dropped)",
            input.len() - max_lines
        );
    }

    let heading_style = ctx.style(FontFace::Bold, theme.body_size);
    let line_style = ctx.style(FontFace::Italic, theme.body_size);

    let heading_advance = heading_style.line_height + HEADING_GAP;
    flow.ensure_space(heading_advance + line_style.line_height);
    flow.push(ctx.line_box(BoxRole::Notes, x, flow.y(), width, "Notes", &heading_style));
    flow.advance(heading_advance);

    for raw in input.into_iter().take(max_lines) {
        let wrapped = ctx.wrap(raw, &line_style, width);
        if wrapped.is_empty() {
            flow.advance(line_style.line_height / 2.0);
            continue;
        }
        for line in wrapped {
            flow.ensure_space(line_style.line_height);
            flow.push(ctx.text_box(BoxRole::Notes, x, flow.y(), width, vec![line], &line_style));
            flow.advance(line_style.line_height);
        }
    }
}
