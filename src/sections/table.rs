//! Items table: accent header row, then one atomic row per line item.
//!
//! A row's height is `base_row_height + description_lines *
//! description_line_height` and the whole row is requested from the flow in
//! one `ensure_space` call, so label, description and amounts always land on
//! the same page. When a row opens a new page the header row is drawn again
//! above it.

use crate::fonts::{wrap_paragraphs, FontFace};
use crate::kind::{Column, ColumnKey, DocumentKind};
use crate::layout_config::{BoxRole, LayoutBox};
use crate::model::{LineItem, TaxMode};
use crate::money::{format_amount, format_percent, format_quantity, line_net};
use crate::pagination::PageFlow;

use super::{Align, RenderContext, TextStyle};

/// A column resolved to page coordinates.
#[derive(Debug, Clone, Copy)]
struct PlacedColumn {
    column: Column,
    x: f32,
    width: f32,
}

/// Places columns left to right; the designation column takes whatever the
/// fixed-width columns leave.
fn place_columns(columns: &[Column], left: f32, total_width: f32) -> Vec<PlacedColumn> {
    let fixed: f32 = columns.iter().filter_map(|c| c.width).sum();
    let flexible = (total_width - fixed).max(0.0);
    let mut x = left;
    columns
        .iter()
        .map(|&column| {
            let width = column.width.unwrap_or(flexible);
            let placed = PlacedColumn { column, x, width };
            x += width;
            placed
        })
        .collect()
}

/// Height a row needs: fixed base plus one line per wrapped description line.
pub fn row_height(ctx: &RenderContext, description_lines: usize) -> f32 {
    ctx.theme.base_row_height + description_lines as f32 * ctx.theme.description_line_height
}

pub fn render_items_table(
    flow: &mut PageFlow,
    ctx: &RenderContext,
    kind: DocumentKind,
    tax_mode: TaxMode,
    items: &[LineItem],
) {
    let theme = ctx.theme;
    let has_discount = items.iter().any(|i| i.discount_percent != 0.0);
    let columns = place_columns(
        &kind.columns(tax_mode, has_discount),
        flow.left(),
        flow.content_width(),
    );
    let designation_width = columns
        .iter()
        .find(|c| c.column.key == ColumnKey::Designation)
        .map(|c| c.width)
        .unwrap_or_else(|| flow.content_width());

    let description_style = ctx
        .small()
        .colored(theme.muted);
    let description_style = TextStyle {
        line_height: theme.description_line_height,
        ..description_style
    };
    let wrap_width = (designation_width - 2.0 * theme.cell_padding).max(1.0);

    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| match &item.description {
            Some(text) => wrap_paragraphs(
                text,
                description_style.size,
                description_style.face,
                wrap_width,
                ctx.fonts,
            ),
            None => Vec::new(),
        })
        .collect();

    let header_h = theme.header_row_height;
    let first_row = rows.first().map(|d| row_height(ctx, d.len())).unwrap_or(0.0);
    flow.ensure_space(header_h + first_row);
    // No row placed on the current page yet.
    let mut fresh_page = flow.at_page_top();
    if flow.remaining() >= header_h + first_row {
        draw_header_row(flow, ctx, &columns);
    }

    for (index, (item, description)) in items.iter().zip(rows).enumerate() {
        let height = row_height(ctx, description.len());
        if !fresh_page && flow.remaining() < height {
            flow.new_page();
            // A row that only fits a bare page goes without the repeated header.
            if flow.remaining() >= header_h + height {
                draw_header_row(flow, ctx, &columns);
            }
        }
        fresh_page = false;
        let row = build_row(
            ctx,
            &columns,
            index,
            item,
            tax_mode,
            description,
            &description_style,
            flow.left(),
            flow.y(),
            flow.content_width(),
            height,
        );
        flow.push(row);
        flow.advance(height);
    }

    log::debug!(
        "items table: {} rows, ends on page {}",
        items.len(),
        flow.current_page_index() + 1
    );
    flow.advance(theme.section_gap);
}

fn draw_header_row(flow: &mut PageFlow, ctx: &RenderContext, columns: &[PlacedColumn]) {
    let theme = ctx.theme;
    let y = flow.y();
    let mut header = LayoutBox::new(
        BoxRole::TableHeader,
        flow.left(),
        y,
        flow.content_width(),
        theme.header_row_height,
    )
    .filled(theme.accent.to_array());

    let style = ctx
        .style(FontFace::Bold, theme.small_size)
        .colored(theme.on_accent);
    let text_y = y + (theme.header_row_height - style.line_height) / 2.0;
    for col in columns {
        header
            .children
            .push(cell(ctx, col, text_y, col.column.title, &style));
    }

    flow.push(header);
    flow.advance(theme.header_row_height);
}

#[allow(clippy::too_many_arguments)]
fn build_row(
    ctx: &RenderContext,
    columns: &[PlacedColumn],
    index: usize,
    item: &LineItem,
    tax_mode: TaxMode,
    description: Vec<String>,
    description_style: &TextStyle,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> LayoutBox {
    let theme = ctx.theme;
    let mut row = LayoutBox::new(BoxRole::TableRow { index }, x, y, width, height);
    if index % 2 == 1 {
        row = row.filled(theme.row_shade.to_array());
    }

    let body = ctx.body();
    let text_y = y + (theme.base_row_height - body.line_height) / 2.0;

    for col in columns {
        let value = match col.column.key {
            ColumnKey::Designation => {
                let label_style = ctx.style(FontFace::Bold, theme.body_size);
                row.children
                    .push(cell(ctx, col, text_y, &item.label, &label_style));
                if !description.is_empty() {
                    row.children.push(ctx.text_box(
                        BoxRole::Content,
                        col.x + theme.cell_padding,
                        text_y + label_style.line_height,
                        col.width - 2.0 * theme.cell_padding,
                        description.clone(),
                        description_style,
                    ));
                }
                continue;
            }
            ColumnKey::Quantity => format_quantity(item.quantity),
            ColumnKey::Unit => item.unit.trim().to_string(),
            ColumnKey::UnitPrice => format_amount(item.unit_price),
            ColumnKey::Discount if item.discount_percent != 0.0 => {
                format_percent(item.discount_percent)
            }
            ColumnKey::Discount => String::new(),
            ColumnKey::TaxRate => match tax_mode {
                TaxMode::Standard => format_percent(item.tax_rate_percent),
                TaxMode::Exempt => String::new(),
            },
            ColumnKey::Total => format_amount(line_net(item)),
        };
        if !value.is_empty() {
            row.children.push(cell(ctx, col, text_y, &value, &body));
        }
    }
    row
}

/// One cell's text inside its column padding; numeric columns are
/// right-aligned against the column's right edge.
fn cell(ctx: &RenderContext, col: &PlacedColumn, y: f32, text: &str, style: &TextStyle) -> LayoutBox {
    let pad = ctx.theme.cell_padding;
    let style = if col.column.numeric {
        style.aligned(Align::Right)
    } else {
        *style
    };
    ctx.line_box(
        BoxRole::Content,
        col.x + pad,
        y,
        (col.width - 2.0 * pad).max(1.0),
        text,
        &style,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontManager;
    use crate::layout_config::PageLayout;
    use crate::style::Theme;

    fn rows_of(page: &PageLayout) -> Vec<&LayoutBox> {
        page.boxes
            .iter()
            .filter(|b| matches!(b.role, BoxRole::TableRow { .. }))
            .collect()
    }

    #[test]
    fn designation_takes_remaining_width() {
        let cols = DocumentKind::Invoice.columns(TaxMode::Standard, false);
        let placed = place_columns(&cols, 40.0, 515.0);
        let fixed: f32 = 40.0 + 45.0 + 70.0 + 40.0 + 75.0;
        assert!((placed[0].width - (515.0 - fixed)).abs() < 1e-4);
        let last = placed.last().unwrap();
        assert!((last.x + last.width - 555.0).abs() < 1e-3);
    }

    #[test]
    fn row_height_follows_description_lines() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let items = vec![
            LineItem::new("Déplacement", 1.0, 40.0, 20.0),
            LineItem::new("Remplacement chauffe-eau", 1.0, 890.0, 10.0)
                .with_description("Dépose de l'ancien\nPose du nouveau\nMise en service"),
        ];
        render_items_table(&mut flow, &ctx, DocumentKind::Invoice, TaxMode::Standard, &items);

        let pages = flow.into_pages();
        let rows = rows_of(&pages[0]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].height, theme.base_row_height);
        assert_eq!(rows[1].height, theme.base_row_height + 3.0 * theme.description_line_height);
        assert!(rows[0].background_color.is_none());
        assert!(rows[1].background_color.is_some());
        assert!(rows[1].text_lines().contains(&"Pose du nouveau"));
        assert!(rows[1].text_lines().contains(&"890,00 €"));
        assert!(rows[1].text_lines().contains(&"10 %"));
    }

    #[test]
    fn numeric_cells_are_right_aligned() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let items = vec![LineItem::new("Main d'oeuvre", 2.5, 45.0, 20.0).with_unit("h")];
        render_items_table(&mut flow, &ctx, DocumentKind::Quote, TaxMode::Standard, &items);

        let pages = flow.into_pages();
        let row = rows_of(&pages[0])[0];
        let total = row
            .children
            .iter()
            .find(|c| c.text_lines() == vec!["112,50 €"])
            .unwrap();
        let line = &total.text.as_ref().unwrap().lines[0];
        let width = fonts.measure_text_width("112,50 €", theme.body_size, FontFace::Regular);
        assert!((total.x + line.x_offset + width - (555.28 - theme.cell_padding)).abs() < 1e-2);
    }

    #[test]
    fn header_is_repeated_after_a_break() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 300.0, 40.0, 36.0);
        let items: Vec<LineItem> = (0..12)
            .map(|i| LineItem::new(&format!("Poste {i}"), 1.0, 10.0, 20.0))
            .collect();
        render_items_table(&mut flow, &ctx, DocumentKind::Invoice, TaxMode::Standard, &items);

        let pages = flow.into_pages();
        assert!(pages.len() > 1);
        for page in &pages {
            let header = page.boxes_with_role(BoxRole::TableHeader).next().unwrap();
            let first_row = rows_of(page)[0];
            assert_eq!(first_row.y, header.bottom());
        }
        let total_rows: usize = pages.iter().map(|p| rows_of(p).len()).sum();
        assert_eq!(total_rows, 12);
    }

    #[test]
    fn discount_column_only_when_discounted() {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let items = vec![
            LineItem::new("Robinet", 1.0, 80.0, 20.0).with_discount(10.0),
            LineItem::new("Joint", 4.0, 2.0, 20.0),
        ];
        render_items_table(&mut flow, &ctx, DocumentKind::Quote, TaxMode::Standard, &items);
        let pages = flow.into_pages();
        let header = pages[0].boxes_with_role(BoxRole::TableHeader).next().unwrap();
        assert!(header.text_lines().contains(&"Remise"));
        assert!(rows_of(&pages[0])[0].text_lines().contains(&"72,00 €"));
    }

    fn tall_row_pages(description_lines: usize) -> Vec<PageLayout> {
        let fonts = FontManager::new();
        let theme = Theme::default();
        let ctx = RenderContext::new(&fonts, &theme);
        let mut flow = PageFlow::new(595.28, 841.89, 40.0, 36.0);
        let description = (1..=description_lines)
            .map(|i| format!("Ligne {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let items = vec![
            LineItem::new("Déplacement", 1.0, 40.0, 20.0),
            LineItem::new("Rénovation salle de bains", 1.0, 6400.0, 10.0)
                .with_description(&description),
        ];
        render_items_table(&mut flow, &ctx, DocumentKind::Invoice, TaxMode::Standard, &items);
        flow.into_pages()
    }

    #[test]
    fn row_after_repeated_header_stays_above_footer() {
        // 20 + 62 × 11 = 702 pt: too tall for what page 1 has left, fits below a header.
        let pages = tall_row_pages(62);
        assert_eq!(pages.len(), 2);
        let header = pages[1].boxes_with_role(BoxRole::TableHeader).next().unwrap();
        let row = rows_of(&pages[1])[0];
        assert_eq!(row.role, BoxRole::TableRow { index: 1 });
        assert_eq!(row.y, header.bottom());
        assert!(row.bottom() <= 841.89 - 40.0 - 36.0 + 1e-3);
    }

    #[test]
    fn page_tall_row_drops_repeated_header() {
        // 20 + 64 × 11 = 724 pt: fits the 725.89 pt content area only without a header.
        let pages = tall_row_pages(64);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].boxes_with_role(BoxRole::TableHeader).count(), 0);
        let row = rows_of(&pages[1])[0];
        assert_eq!(row.y, 40.0);
        for page in &pages {
            for row in rows_of(page) {
                assert!(row.bottom() <= 841.89 - 40.0 - 36.0 + 1e-3);
            }
        }
    }
}
