//! Recipient box: fixed-size shaded panel against the right margin.

use crate::fonts::{truncate_chars, FontFace};
use crate::layout_config::{BoxRole, LayoutBox};
use crate::model::Party;
use crate::pagination::PageFlow;

use super::header::present;
use super::RenderContext;

const BOX_PADDING: f32 = 10.0;

/// Offset from the header band's top; the box never depends on how tall the
/// issuer header turned out.
const BOX_TOP_OFFSET: f32 = 10.0;

/// At most three lines under the recipient name.
const MAX_SECONDARY_LINES: usize = 3;

/// Draws the recipient box and returns its bottom edge.
pub fn render_recipient(flow: &mut PageFlow, ctx: &RenderContext, recipient: &Party) -> f32 {
    let theme = ctx.theme;
    let x = flow.right() - theme.recipient_box_width;
    let y = flow.y() + BOX_TOP_OFFSET;

    let mut panel = LayoutBox::new(
        BoxRole::Recipient,
        x,
        y,
        theme.recipient_box_width,
        theme.recipient_box_height,
    )
    .filled(theme.panel_shade.to_array());

    panel.children.push(
        LayoutBox::new(
            BoxRole::Content,
            x,
            y,
            theme.recipient_accent_width,
            theme.recipient_box_height,
        )
        .filled(theme.accent.to_array()),
    );

    let inner_x = x + theme.recipient_accent_width + BOX_PADDING;
    let inner_w = theme.recipient_box_width - theme.recipient_accent_width - 2.0 * BOX_PADDING;

    let label_style = ctx
        .style(FontFace::Bold, theme.small_size)
        .colored(theme.accent);
    let label = ctx.line_box(BoxRole::Content, inner_x, y + BOX_PADDING, inner_w, "CLIENT", &label_style);

    let name_style = ctx.style(FontFace::Bold, theme.body_size + 1.0);
    let name = ctx.line_box(
        BoxRole::Content,
        inner_x,
        label.bottom() + 2.0,
        inner_w,
        recipient.display_name(),
        &name_style,
    );

    let detail_style = ctx.body();
    let details: Vec<String> = secondary_lines(recipient, theme.recipient_address_chars)
        .into_iter()
        .map(|line| ctx.fit(&line, &detail_style, inner_w))
        .collect();
    let details = ctx.text_box(
        BoxRole::Content,
        inner_x,
        name.bottom() + 2.0,
        inner_w,
        details,
        &detail_style,
    );

    panel.children.push(label);
    panel.children.push(name);
    panel.children.push(details);

    let bottom = panel.bottom();
    flow.push(panel);
    bottom
}

/// Address (one line, capped at `address_chars`), email, phone.
fn secondary_lines(recipient: &Party, address_chars: usize) -> Vec<String> {
    let address = present(&recipient.address).map(|a| {
        let single = a.split_whitespace().collect::<Vec<_>>().join(" ");
        truncate_chars(&single, address_chars)
    });
    [
        address,
        present(&recipient.email).map(str::to_string),
        present(&recipient.phone).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .take(MAX_SECONDARY_LINES)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::style::Theme;

    #[test]
    fn box_sits_against_right_margin_with_fixed_height() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let recipient = Party {
            name: Some("Marie Martin".into()),
            address: Some("Résidence les Acacias, bâtiment B, 47 avenue de la République, 69003 Lyon".into()),
            email: Some("marie@example.fr".into()),
            phone: Some("07 00 00 00 00".into()),
            ..Party::default()
        };
        let bottom = render_recipient(&mut flow, &ctx, &recipient);

        let pages = flow.into_pages();
        let panel = pages[0].boxes_with_role(BoxRole::Recipient).next().unwrap();
        assert!((panel.x + panel.width - (595.28 - 40.0)).abs() < 1e-3);
        assert_eq!(panel.height, theme.recipient_box_height);
        assert_eq!(bottom, panel.bottom());

        let lines = panel.text_lines();
        assert_eq!(lines[0], "CLIENT");
        assert_eq!(lines[1], "Marie Martin");
        assert_eq!(lines.len(), 5);
        assert!(lines[2].ends_with("..."));
        assert!(lines[2].chars().count() <= theme.recipient_address_chars);
    }

    #[test]
    fn missing_fields_are_skipped() {
        let recipient = Party {
            name: Some("Paul".into()),
            phone: Some("01 02 03 04 05".into()),
            email: Some("  ".into()),
            ..Party::default()
        };
        assert_eq!(secondary_lines(&recipient, 48), vec!["01 02 03 04 05"]);
    }
}
