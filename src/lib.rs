//! # devis-forge – quote and invoice PDF layout engine
//!
//! Lays out French quotes (devis) and invoices (factures) and renders them
//! to PDF. The pipeline stages are:
//!
//! 1. **Request** – typed issuer, recipient, metadata and line items ([`model`])
//! 2. **Assemble** – section renderers flowing through a paginating cursor
//!    ([`assembler`], [`sections`], [`pagination`])
//! 3. **Stamp** – footers with the final page count ([`footer`])
//! 4. **Freeze** – a serialisable per-page layout ([`layout_config`])
//! 5. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! Quotes and invoices share one core; [`kind::DocumentKind`] supplies what
//! differs. A C-compatible FFI surface is exposed via the [`ffi`] module.

pub mod assembler;
pub mod assets;
pub mod error;
pub mod ffi;
pub mod fonts;
pub mod footer;
pub mod kind;
pub mod layout_config;
pub mod model;
pub mod money;
pub mod pagination;
pub mod pipeline;
pub mod render;
pub mod sections;
pub mod style;
pub mod templates;

// Re-exports for convenience
pub use error::{ForgeError, Result};
pub use kind::DocumentKind;
pub use model::{DocumentMeta, DocumentRequest, LineItem, Party, RecipientType, TaxMode};
pub use pipeline::{generate_pdf, generate_pdf_from_json, PageOrientation, PipelineConfig, RenderedDocument};
