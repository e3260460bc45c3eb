//! Footer compositor.
//!
//! Runs once over the finished page list, when the total page count is
//! known, and stamps every page with the same separator rule, issuer
//! identity line and an `i/N` marker.

use crate::fonts::FontFace;
use crate::layout_config::{BoxRole, LayoutBox, PageLayout};
use crate::model::Party;
use crate::pagination::PageGeometry;
use crate::sections::{Align, RenderContext};

const SEPARATOR: &str = " - ";

/// Distance from the top of the footer zone to the separator rule.
const RULE_OFFSET: f32 = 10.0;

/// Width kept free on each side of the identity line for the page marker.
const MARKER_WIDTH: f32 = 40.0;

/// Issuer name, SIRET, phone and email joined with a fixed separator.
pub fn identity_line(issuer: &Party) -> String {
    let mut parts: Vec<String> = Vec::new();
    let name = issuer.display_name().trim();
    if !name.is_empty() {
        parts.push(name.to_string());
    }
    let field = |f: &Option<String>| {
        f.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    if let Some(tax_id) = field(&issuer.tax_id) {
        parts.push(format!("SIRET : {tax_id}"));
    }
    parts.extend(field(&issuer.phone));
    parts.extend(field(&issuer.email));
    parts.join(SEPARATOR)
}

pub fn stamp_footers(
    pages: &mut [PageLayout],
    ctx: &RenderContext,
    issuer: &Party,
    geometry: &PageGeometry,
) {
    let theme = ctx.theme;
    let total = pages.len();
    let left = geometry.margin;
    let width = geometry.width - 2.0 * geometry.margin;
    let rule_y = geometry.height - geometry.margin - geometry.footer_zone + RULE_OFFSET;
    let text_y = rule_y + 6.0;

    let style = ctx.style(FontFace::Regular, theme.footer_size).colored(theme.muted);
    let centered = style.aligned(Align::Center);
    let identity = identity_line(issuer);
    let identity_width = (width - 2.0 * MARKER_WIDTH).max(1.0);

    for (i, page) in pages.iter_mut().enumerate() {
        page.boxes.push(
            LayoutBox::new(BoxRole::FooterRule, left, rule_y, width, 0.5).filled(theme.rule.to_array()),
        );
        if !identity.is_empty() {
            page.boxes.push(ctx.line_box(
                BoxRole::FooterIdentity,
                left + MARKER_WIDTH,
                text_y,
                identity_width,
                &identity,
                &centered,
            ));
        }
        page.boxes.push(ctx.line_box(
            BoxRole::PageMarker,
            left + width - MARKER_WIDTH,
            text_y,
            MARKER_WIDTH,
            &format!("{}/{}", i + 1, total),
            &style.aligned(Align::Right),
        ));
    }
    log::debug!("footers stamped on {total} pages");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::style::Theme;

    fn issuer() -> Party {
        Party {
            company_name: Some("Dupont Plomberie".into()),
            tax_id: Some("123 456 789 00012".into()),
            phone: Some("06 12 34 56 78".into()),
            email: Some("contact@dupont.fr".into()),
            ..Party::default()
        }
    }

    #[test]
    fn identity_joins_present_fields() {
        assert_eq!(
            identity_line(&issuer()),
            "Dupont Plomberie - SIRET : 123 456 789 00012 - 06 12 34 56 78 - contact@dupont.fr"
        );
        let sparse = Party {
            name: Some("Jean".into()),
            email: Some("jean@x.fr".into()),
            ..Party::default()
        };
        assert_eq!(identity_line(&sparse), "Jean - jean@x.fr");
    }

    #[test]
    fn every_page_gets_marker_with_final_total() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let geometry = PageGeometry {
            width: 595.28,
            height: 841.89,
            margin: 40.0,
            footer_zone: 36.0,
        };
        let mut pages: Vec<PageLayout> = (0..4).map(PageLayout::new).collect();
        stamp_footers(&mut pages, &ctx, &issuer(), &geometry);

        for (i, page) in pages.iter().enumerate() {
            let marker = page.boxes_with_role(BoxRole::PageMarker).next().unwrap();
            assert_eq!(marker.text_lines(), vec![format!("{}/4", i + 1).as_str()]);
            assert_eq!(page.boxes_with_role(BoxRole::FooterRule).count(), 1);
            let identity = page.boxes_with_role(BoxRole::FooterIdentity).next().unwrap();
            assert_eq!(identity.text_lines(), vec![identity_line(&issuer()).as_str()]);
            assert!(marker.y > 841.89 - 40.0 - 36.0);
        }
    }
}
