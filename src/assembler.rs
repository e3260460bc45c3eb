//! Document assembler.
//!
//! Drives the section renderers in a fixed order over one [`PageFlow`]:
//!
//! ```text
//! Idle → HeaderRendered → RecipientRendered → TitleRendered → TableRendered
//!      → TotalsRendered → LegalRendered → [NotesRendered] → Finalized
//! ```
//!
//! Transitions only move forward. `NotesRendered` is skipped when the
//! document has no notes. Reaching `Finalized` runs the footer compositor
//! over the complete page list and freezes it into a [`LayoutConfig`].

use crate::assets::LogoImage;
use crate::footer::stamp_footers;
use crate::kind::DocumentKind;
use crate::layout_config::LayoutConfig;
use crate::model::DocumentRequest;
use crate::money::totals;
use crate::pagination::{PageFlow, PageGeometry};
use crate::sections::header::render_header;
use crate::sections::legal::render_legal;
use crate::sections::notes::render_notes;
use crate::sections::recipient::render_recipient;
use crate::sections::table::render_items_table;
use crate::sections::title::render_title;
use crate::sections::totals::render_totals;
use crate::sections::RenderContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssemblyStage {
    Idle,
    HeaderRendered,
    RecipientRendered,
    TitleRendered,
    TableRendered,
    TotalsRendered,
    LegalRendered,
    NotesRendered,
    Finalized,
}

/// Layout of a finished document plus the stages it went through.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub layout: LayoutConfig,
    pub stages: Vec<AssemblyStage>,
}

pub struct DocumentAssembler<'a> {
    request: &'a DocumentRequest,
    ctx: RenderContext<'a>,
    geometry: PageGeometry,
    logo: Option<&'a LogoImage>,
    max_note_lines: usize,
    title: Option<String>,
    flow: PageFlow,
    stage: AssemblyStage,
    stages: Vec<AssemblyStage>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        request: &'a DocumentRequest,
        ctx: RenderContext<'a>,
        geometry: PageGeometry,
        logo: Option<&'a LogoImage>,
        max_note_lines: usize,
    ) -> Self {
        Self {
            request,
            ctx,
            geometry,
            logo,
            max_note_lines,
            title: None,
            flow: geometry.flow(),
            stage: AssemblyStage::Idle,
            stages: vec![AssemblyStage::Idle],
        }
    }

    /// PDF metadata title; defaults to "Devis …"/"Facture …".
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn stage(&self) -> AssemblyStage {
        self.stage
    }

    fn advance_to(&mut self, next: AssemblyStage) {
        debug_assert!(next > self.stage, "assembly stages only move forward");
        log::debug!(
            "{}: {:?} -> {:?} (page {}, y {:.1})",
            self.request.meta.document_number,
            self.stage,
            next,
            self.flow.current_page_index() + 1,
            self.flow.y()
        );
        self.stage = next;
        self.stages.push(next);
    }

    /// Run every stage and return the frozen layout.
    pub fn assemble(mut self) -> Assembled {
        let request = self.request;
        let ctx = self.ctx;
        let meta = &request.meta;

        let header_bottom = render_header(&mut self.flow, &ctx, &request.issuer, self.logo);
        self.advance_to(AssemblyStage::HeaderRendered);

        let recipient_bottom = render_recipient(&mut self.flow, &ctx, &request.recipient);
        self.advance_to(AssemblyStage::RecipientRendered);

        self.flow
            .set_y(header_bottom.max(recipient_bottom) + ctx.theme.section_gap);
        render_title(&mut self.flow, &ctx, request.kind, meta);
        self.advance_to(AssemblyStage::TitleRendered);

        render_items_table(&mut self.flow, &ctx, request.kind, meta.tax_mode, &request.items);
        self.advance_to(AssemblyStage::TableRendered);

        render_totals(
            &mut self.flow,
            &ctx,
            &totals(&request.items, meta.tax_mode),
            meta.tax_mode,
        );
        self.advance_to(AssemblyStage::TotalsRendered);

        render_legal(&mut self.flow, &ctx, &request.kind.legal_mentions(meta));
        self.advance_to(AssemblyStage::LegalRendered);

        if let Some(notes) = meta.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            render_notes(&mut self.flow, &ctx, notes, self.max_note_lines);
            self.advance_to(AssemblyStage::NotesRendered);
        }

        self.advance_to(AssemblyStage::Finalized);
        let title = self
            .title
            .take()
            .unwrap_or_else(|| default_title(request.kind, &meta.document_number));
        let geometry = self.geometry;
        let mut pages = self.flow.into_pages();
        stamp_footers(&mut pages, &ctx, &request.issuer, &geometry);

        Assembled {
            layout: LayoutConfig {
                title,
                page_width_pt: geometry.width,
                page_height_pt: geometry.height,
                pages,
            },
            stages: self.stages,
        }
    }
}

fn default_title(kind: DocumentKind, number: &str) -> String {
    let word = match kind {
        DocumentKind::Quote => "Devis",
        DocumentKind::Invoice => "Facture",
    };
    format!("{word} {}", number.trim())
}
