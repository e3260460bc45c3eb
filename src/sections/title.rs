//! Document title block: kind and number, issue date, then the optional
//! service-date and validity lines.

use crate::fonts::FontFace;
use crate::kind::{format_date, validity_end, DocumentKind};
use crate::layout_config::{BoxRole, LayoutBox};
use crate::model::DocumentMeta;
use crate::pagination::PageFlow;

use super::RenderContext;

pub fn render_title(flow: &mut PageFlow, ctx: &RenderContext, kind: DocumentKind, meta: &DocumentMeta) {
    let theme = ctx.theme;
    let x = flow.left();
    let width = flow.content_width();

    let heading_style = ctx
        .style(FontFace::Bold, theme.title_size)
        .colored(theme.accent);
    let heading = format!("{} N° {}", kind.title(), meta.document_number.trim());

    let mut lines = vec![format!("Date : {}", format_date(meta.issue_date))];
    if let Some(service) = meta.service_date {
        lines.push(format!("Date de prestation : {}", format_date(service)));
    }
    if kind == DocumentKind::Quote {
        if let (Some(days), Some(until)) = (meta.validity_days, validity_end(meta)) {
            lines.push(format!("Validité : {days} jours (jusqu'au {})", format_date(until)));
        }
    }
    let detail_style = ctx.body().colored(theme.muted);

    let block_height = heading_style.line_height + 2.0 + lines.len() as f32 * detail_style.line_height;
    flow.ensure_space(block_height);

    let y = flow.y();
    let heading = ctx.line_box(BoxRole::Content, x, y, width, &heading, &heading_style);
    let details = ctx.text_box(BoxRole::Content, x, heading.bottom() + 2.0, width, lines, &detail_style);

    let mut block = LayoutBox::new(BoxRole::Title, x, y, width, details.bottom() - y);
    block.children.push(heading);
    block.children.push(details);
    flow.set_y(block.bottom() + theme.section_gap);
    flow.push(block);
}
