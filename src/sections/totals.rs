//! Totals panel, right-aligned under the items table.

use crate::fonts::FontFace;
use crate::kind::VAT_EXEMPT_MENTION;
use crate::layout_config::{BoxRole, LayoutBox};
use crate::model::TaxMode;
use crate::money::{format_amount, format_percent, Totals};
use crate::pagination::PageFlow;

use super::{Align, RenderContext};

const PANEL_PADDING: f32 = 8.0;

/// Draws the totals panel as one unbreakable unit.
pub fn render_totals(flow: &mut PageFlow, ctx: &RenderContext, totals: &Totals, tax_mode: TaxMode) {
    let theme = ctx.theme;
    let row_h = theme.totals_row_height;

    let mut rows: Vec<(String, String)> = vec![("Total HT".into(), format_amount(totals.total_ht))];
    let exempt = tax_mode == TaxMode::Exempt;
    if !exempt {
        rows.extend(
            totals
                .per_rate
                .iter()
                .map(|(rate, amount)| (format!("TVA {}", format_percent(*rate)), format_amount(*amount))),
        );
    }

    let disclaimer_style = ctx.small().colored(theme.muted);
    let width = theme.totals_width;
    let disclaimer = if exempt {
        ctx.wrap(VAT_EXEMPT_MENTION, &disclaimer_style, width - 2.0 * PANEL_PADDING)
    } else {
        Vec::new()
    };
    let disclaimer_h = if disclaimer.is_empty() {
        0.0
    } else {
        disclaimer.len() as f32 * disclaimer_style.line_height + PANEL_PADDING
    };

    let height = rows.len() as f32 * row_h + disclaimer_h + row_h + 4.0;
    flow.ensure_space(height);

    let x = flow.right() - width;
    let y = flow.y();
    let mut panel = LayoutBox::new(BoxRole::Totals, x, y, width, height)
        .filled(theme.panel_shade.to_array())
        .bordered(0.5, theme.rule.to_array());

    let label_style = ctx.body();
    let amount_style = ctx.body().aligned(Align::Right);
    let inner_x = x + PANEL_PADDING;
    let inner_w = width - 2.0 * PANEL_PADDING;
    let mut cursor = y;
    for (label, amount) in &rows {
        let text_y = cursor + (row_h - label_style.line_height) / 2.0;
        panel
            .children
            .push(ctx.line_box(BoxRole::Content, inner_x, text_y, inner_w, label, &label_style));
        panel
            .children
            .push(ctx.line_box(BoxRole::Content, inner_x, text_y, inner_w, amount, &amount_style));
        cursor += row_h;
    }

    if !disclaimer.is_empty() {
        let text = ctx.text_box(
            BoxRole::Content,
            inner_x,
            cursor + PANEL_PADDING / 2.0,
            inner_w,
            disclaimer,
            &disclaimer_style,
        );
        cursor = text.bottom() + PANEL_PADDING / 2.0;
        panel.children.push(text);
    }

    // Highlighted grand total.
    cursor += 4.0;
    let mut grand = LayoutBox::new(BoxRole::Content, x, cursor, width, row_h)
        .filled(theme.accent.to_array());
    let grand_label = ctx
        .style(FontFace::Bold, theme.body_size + 1.0)
        .colored(theme.on_accent);
    let text_y = cursor + (row_h - grand_label.line_height) / 2.0;
    grand.children.push(ctx.line_box(
        BoxRole::Content,
        inner_x,
        text_y,
        inner_w,
        "Total TTC",
        &grand_label,
    ));
    grand.children.push(ctx.line_box(
        BoxRole::Content,
        inner_x,
        text_y,
        inner_w,
        &format_amount(totals.total_ttc),
        &grand_label.aligned(Align::Right),
    ));
    panel.children.push(grand);

    flow.set_y(panel.bottom() + theme.section_gap);
    flow.push(panel);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::model::LineItem;
    use crate::money::totals;
    use crate::style::Theme;

    fn panel_lines(tax_mode: TaxMode, items: &[LineItem]) -> Vec<String> {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        render_totals(&mut flow, &ctx, &totals(items, tax_mode), tax_mode);
        let pages = flow.into_pages();
        let panel = pages[0].boxes_with_role(BoxRole::Totals).next().unwrap();
        panel.text_lines().into_iter().map(str::to_string).collect()
    }

    #[test]
    fn rates_listed_in_ascending_order() {
        let items = vec![
            LineItem::new("A", 1.0, 100.0, 20.0),
            LineItem::new("B", 1.0, 100.0, 5.5),
            LineItem::new("C", 1.0, 100.0, 10.0),
        ];
        let lines = panel_lines(TaxMode::Standard, &items);
        assert_eq!(
            lines,
            vec![
                "Total HT", "300,00 €",
                "TVA 5,5 %", "5,50 €",
                "TVA 10 %", "10,00 €",
                "TVA 20 %", "20,00 €",
                "Total TTC", "335,50 €",
            ]
        );
    }

    #[test]
    fn exempt_shows_disclaimer_instead_of_tax_rows() {
        let items = vec![LineItem::new("A", 2.0, 100.0, 20.0)];
        let lines = panel_lines(TaxMode::Exempt, &items);
        assert!(!lines.iter().any(|l| l.starts_with("TVA ") && l.ends_with('%')));
        assert!(lines.concat().contains("293 B"));
        assert_eq!(lines.last().unwrap(), "200,00 €");
    }

    #[test]
    fn grand_total_is_highlighted() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let items = vec![LineItem::new("A", 1.0, 10.0, 20.0)];
        render_totals(&mut flow, &ctx, &totals(&items, TaxMode::Standard), TaxMode::Standard);
        let pages = flow.into_pages();
        let panel = pages[0].boxes_with_role(BoxRole::Totals).next().unwrap();
        let grand = panel.children.last().unwrap();
        assert_eq!(grand.background_color, Some(theme.accent.to_array()));
        assert!(grand.bottom() <= panel.bottom() + 1e-3);
        assert_eq!(panel.border.as_ref().map(|b| b.color), Some(theme.rule.to_array()));
    }
}
