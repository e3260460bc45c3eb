//! Issuer header: optional logo at the top-left corner, issuer identity and
//! contact lines beside it (or flush-left without a logo).

use crate::assets::LogoImage;
use crate::fonts::FontFace;
use crate::layout_config::{BoxRole, ImageContent, LayoutBox};
use crate::model::Party;
use crate::pagination::PageFlow;

use super::RenderContext;

/// Space between the logo and the issuer text, and between the issuer text
/// and the recipient box.
const HEADER_GUTTER: f32 = 12.0;

/// Draws the header on the current page and returns its bottom edge. The
/// cursor is left untouched: the recipient box shares the same band.
pub fn render_header(
    flow: &mut PageFlow,
    ctx: &RenderContext,
    issuer: &Party,
    logo: Option<&LogoImage>,
) -> f32 {
    let theme = ctx.theme;
    let top = flow.y();
    let left = flow.left();
    let mut bottom = top;

    let mut text_x = left;
    if let Some(logo) = logo {
        let (w, h) = logo.fit_within(theme.logo_max_width, theme.logo_max_height);
        if w > 0.0 && h > 0.0 {
            let mut lbox = LayoutBox::new(BoxRole::Logo, left, top, w, h);
            lbox.image = Some(ImageContent {
                src: logo.data_uri(),
                width: w,
                height: h,
            });
            flow.push(lbox);
            text_x = left + w + HEADER_GUTTER;
            bottom = bottom.max(top + h);
        }
    }

    let text_width = (flow.right() - theme.recipient_box_width - HEADER_GUTTER - text_x).max(40.0);

    let name_style = ctx.style(FontFace::Bold, theme.issuer_name_size);
    let name = ctx.line_box(
        BoxRole::Content,
        text_x,
        top,
        text_width,
        issuer.display_name(),
        &name_style,
    );

    let detail_style = ctx.body().colored(theme.muted);
    let details: Vec<String> = issuer_details(issuer)
        .into_iter()
        .map(|line| ctx.fit(&line, &detail_style, text_width))
        .collect();
    let details = ctx.text_box(
        BoxRole::Content,
        text_x,
        name.bottom() + 2.0,
        text_width,
        details,
        &detail_style,
    );

    let mut block = LayoutBox::new(
        BoxRole::Issuer,
        text_x,
        top,
        text_width,
        details.bottom() - top,
    );
    bottom = bottom.max(block.bottom());
    block.children.push(name);
    block.children.push(details);
    flow.push(block);

    bottom
}

/// Contact lines under the issuer name, blank fields skipped.
fn issuer_details(issuer: &Party) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(contact) = issuer.contact_name() {
        lines.push(contact.to_string());
    }
    if let Some(address) = present(&issuer.address) {
        lines.extend(
            address
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }
    if let Some(phone) = present(&issuer.phone) {
        lines.push(format!("Tél. : {phone}"));
    }
    if let Some(email) = present(&issuer.email) {
        lines.push(email.to_string());
    }
    if let Some(tax_id) = present(&issuer.tax_id) {
        lines.push(format!("SIRET : {tax_id}"));
    }
    lines
}

pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::LogoFormat;
    use crate::fonts::FontManager;
    use crate::style::Theme;

    fn issuer() -> Party {
        Party {
            name: Some("Jean Dupont".into()),
            company_name: Some("Dupont Plomberie".into()),
            address: Some("12 rue des Lilas\n75011 Paris".into()),
            phone: Some("06 12 34 56 78".into()),
            tax_id: Some("123 456 789 00012".into()),
            ..Party::default()
        }
    }

    #[test]
    fn text_is_flush_left_without_logo() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let bottom = render_header(&mut flow, &ctx, &issuer(), None);

        let pages = flow.into_pages();
        assert_eq!(pages[0].boxes_with_role(BoxRole::Logo).count(), 0);
        let block = pages[0].boxes_with_role(BoxRole::Issuer).next().unwrap();
        assert_eq!(block.x, 40.0);
        assert!((block.bottom() - bottom).abs() < 1e-4);
        let lines = block.text_lines();
        assert_eq!(lines[0], "Dupont Plomberie");
        assert!(lines.contains(&"75011 Paris"));
        assert!(lines.contains(&"SIRET : 123 456 789 00012"));
        assert!(lines.contains(&"Tél. : 06 12 34 56 78"));
    }

    #[test]
    fn text_moves_right_of_logo() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let logo = LogoImage {
            format: LogoFormat::Png,
            bytes: vec![0x89, b'P', b'N', b'G'],
            px_width: 200,
            px_height: 100,
        };
        render_header(&mut flow, &ctx, &issuer(), Some(&logo));

        let pages = flow.into_pages();
        let logo_box = pages[0].boxes_with_role(BoxRole::Logo).next().unwrap();
        assert!((logo_box.width - 110.0).abs() < 1e-3);
        assert!((logo_box.height - 55.0).abs() < 1e-3);
        let block = pages[0].boxes_with_role(BoxRole::Issuer).next().unwrap();
        assert!((block.x - (40.0 + logo_box.width + HEADER_GUTTER)).abs() < 1e-4);
    }
}
