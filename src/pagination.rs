//! Pagination – the page/flow manager every section renderer draws through.
//!
//! [`PageFlow`] owns the page list and a vertical cursor measured top-down
//! from the physical page top. [`PageFlow::ensure_space`] is the only place
//! a page break is decided: a renderer asks for the full height of a unit
//! that must not be split (a table row, one legal line, one notes line) and
//! draws it only afterwards, so such units never straddle two pages.

use crate::layout_config::{LayoutBox, PageLayout};

/// Default page margins in points.
pub const PAGE_MARGIN_PT: f32 = 40.0;

/// Height reserved above the bottom margin for the footer stamp.
pub const FOOTER_ZONE_PT: f32 = 36.0;

/// Physical page size and the bands reserved around content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub footer_zone: f32,
}

impl PageGeometry {
    pub fn flow(&self) -> PageFlow {
        PageFlow::new(self.width, self.height, self.margin, self.footer_zone)
    }
}

#[derive(Debug)]
pub struct PageFlow {
    pages: Vec<PageLayout>,
    y: f32,
    page_width: f32,
    page_height: f32,
    margin: f32,
    footer_zone: f32,
}

impl PageFlow {
    /// Start a flow on a first, empty page.
    pub fn new(page_width: f32, page_height: f32, margin: f32, footer_zone: f32) -> Self {
        Self {
            pages: vec![PageLayout::new(0)],
            y: margin,
            page_width,
            page_height,
            margin,
            footer_zone,
        }
    }

    /// Current cursor (distance from the page top).
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Move the cursor down by `dy`.
    pub fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    /// Place the cursor at an absolute position on the current page.
    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    /// Lowest y content may reach: above the bottom margin and footer zone.
    pub fn content_bottom(&self) -> f32 {
        self.page_height - self.margin - self.footer_zone
    }

    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.page_width - self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn remaining(&self) -> f32 {
        self.content_bottom() - self.y
    }

    /// True while nothing has advanced the cursor on the current page.
    pub fn at_page_top(&self) -> bool {
        self.y <= self.margin
    }

    /// Make sure `required` points fit below the cursor, allocating a new
    /// page (cursor back at the top margin) when they do not.
    ///
    /// Returns `true` when a page was allocated. A unit taller than a whole
    /// page is placed at the top of a fresh page and allowed to overflow;
    /// the flow never refuses content.
    pub fn ensure_space(&mut self, required: f32) -> bool {
        if self.y + required <= self.content_bottom() || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    pub fn new_page(&mut self) {
        let index = self.pages.len();
        log::debug!("allocating page {} (cursor was at {:.1})", index + 1, self.y);
        self.pages.push(PageLayout::new(index));
        self.y = self.margin;
    }

    pub fn push(&mut self, lbox: LayoutBox) {
        if let Some(page) = self.pages.last_mut() {
            page.boxes.push(lbox);
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn into_pages(self) -> Vec<PageLayout> {
        self.pages
    }
}
