//! Legal mentions, one wrapped paragraph per mention. Each wrapped line is
//! its own unit for the flow, so a long clause may continue on the next page
//! but never loses a line between pages.

use crate::fonts::FontFace;
use crate::layout_config::BoxRole;
use crate::pagination::PageFlow;

use super::{RenderContext, HEADING_GAP};

const HEADING: &str = "Mentions légales";

/// Gap between two mentions.
const PARAGRAPH_GAP: f32 = 3.0;

pub fn render_legal(flow: &mut PageFlow, ctx: &RenderContext, mentions: &[String]) {
    if mentions.is_empty() {
        return;
    }
    let theme = ctx.theme;
    let x = flow.left();
    let width = flow.content_width();

    let heading_style = ctx.style(FontFace::Bold, theme.body_size);
    let line_style = ctx.small();

    // Keep the heading with the first line of the first mention.
    let heading_advance = heading_style.line_height + HEADING_GAP;
    flow.ensure_space(heading_advance + line_style.line_height);
    flow.push(ctx.line_box(BoxRole::Legal, x, flow.y(), width, HEADING, &heading_style));
    flow.advance(heading_advance);

    for mention in mentions {
        for line in ctx.wrap(mention, &line_style, width) {
            flow.ensure_space(line_style.line_height);
            flow.push(ctx.text_box(BoxRole::Legal, x, flow.y(), width, vec![line], &line_style));
            flow.advance(line_style.line_height);
        }
        flow.advance(PARAGRAPH_GAP);
    }

    flow.advance(theme.section_gap - PARAGRAPH_GAP);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::style::Theme;

    #[test]
    fn long_mentions_flow_line_by_line() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(300.0, 220.0, 20.0, 20.0);
        let mention = "En cas de retard de paiement, une pénalité égale à trois fois le taux \
                       d'intérêt légal est exigible dès le lendemain de la date d'échéance."
            .repeat(8);
        render_legal(&mut flow, &ctx, &[mention.clone()]);

        let pages = flow.into_pages();
        assert!(pages.len() > 1);
        let text: Vec<String> = pages
            .iter()
            .flat_map(|p| p.boxes_with_role(BoxRole::Legal))
            .skip(1)
            .flat_map(|b| b.text_lines())
            .map(str::to_string)
            .collect();
        let expected: Vec<&str> = mention.split_whitespace().collect();
        assert_eq!(text.join(" ").split_whitespace().collect::<Vec<_>>(), expected);
        for page in &pages {
            for lbox in page.boxes_with_role(BoxRole::Legal) {
                assert!(lbox.bottom() <= 220.0 - 40.0 + 1e-3);
            }
        }
    }

    #[test]
    fn nothing_drawn_without_mentions() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        render_legal(&mut flow, &ctx, &[]);
        assert_eq!(flow.y(), 40.0);
        assert!(flow.into_pages()[0].boxes.is_empty());
    }

    #[test]
    fn heading_stays_with_first_line() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(300.0, 220.0, 40.0, 36.0);
        // Room for heading plus one line, but not for the gap between them.
        let heading_h = ctx.style(FontFace::Bold, theme.body_size).line_height;
        let needed = heading_h + HEADING_GAP + ctx.small().line_height;
        flow.set_y(flow.content_bottom() - needed + 1.0);
        render_legal(&mut flow, &ctx, &["Pas d'escompte pour paiement anticipé.".to_string()]);

        let pages = flow.into_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].boxes_with_role(BoxRole::Legal).count(), 0);
        assert_eq!(pages[1].boxes_with_role(BoxRole::Legal).count(), 2);
    }
}
