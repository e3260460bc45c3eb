//! Document kinds – the only place quotes and invoices differ.
//!
//! Both kinds go through the same assembler; a [`DocumentKind`] supplies the
//! title, the items-table column set and the legal-mention list.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{DocumentMeta, RecipientType, TaxMode};

/// Days between issue date and due date when no due date is given.
pub const DEFAULT_PAYMENT_DELAY_DAYS: u64 = 30;

/// Printed instead of tax rows under the VAT franchise regime.
pub const VAT_EXEMPT_MENTION: &str = "TVA non applicable, art. 293 B du CGI";

const NO_EARLY_PAYMENT_DISCOUNT: &str = "Pas d'escompte pour paiement anticipé.";

const DEFAULT_LATE_FEES: &str = "En cas de retard de paiement, une pénalité égale à trois fois \
     le taux d'intérêt légal est exigible dès le lendemain de la date d'échéance \
     (art. L441-10 du Code de commerce).";

const RECOVERY_INDEMNITY: &str =
    "Indemnité forfaitaire pour frais de recouvrement en cas de retard de paiement : 40 €.";

const QUOTE_ACCEPTANCE: &str = "Bon pour accord : date et signature du client, précédées de \
     la mention manuscrite « Bon pour accord ».";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Quote,
    Invoice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey {
    Designation,
    Quantity,
    Unit,
    UnitPrice,
    Discount,
    TaxRate,
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub key: ColumnKey,
    pub title: &'static str,
    /// Fixed width in points; `None` takes the remaining width.
    pub width: Option<f32>,
    /// Numeric columns are right-aligned.
    pub numeric: bool,
}

impl Column {
    const fn fixed(key: ColumnKey, title: &'static str, width: f32) -> Self {
        Self {
            key,
            title,
            width: Some(width),
            numeric: true,
        }
    }
}

impl DocumentKind {
    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Quote => "DEVIS",
            DocumentKind::Invoice => "FACTURE",
        }
    }

    /// Items-table columns, left to right.
    ///
    /// Invoices carry a per-line VAT rate column unless the document is
    /// exempt; the discount column appears only when some item is discounted.
    pub fn columns(self, tax_mode: TaxMode, has_discount: bool) -> Vec<Column> {
        let mut columns = vec![
            Column {
                key: ColumnKey::Designation,
                title: "Désignation",
                width: None,
                numeric: false,
            },
            Column::fixed(ColumnKey::Quantity, "Qté", 40.0),
            Column {
                numeric: false,
                ..Column::fixed(ColumnKey::Unit, "Unité", 45.0)
            },
            Column::fixed(ColumnKey::UnitPrice, "P.U. HT", 70.0),
        ];
        if has_discount {
            columns.push(Column::fixed(ColumnKey::Discount, "Remise", 45.0));
        }
        if self == DocumentKind::Invoice && tax_mode == TaxMode::Standard {
            columns.push(Column::fixed(ColumnKey::TaxRate, "TVA", 40.0));
        }
        columns.push(Column::fixed(ColumnKey::Total, "Total HT", 75.0));
        columns
    }

    /// Ordered legal mentions printed after the totals.
    pub fn legal_mentions(self, meta: &DocumentMeta) -> Vec<String> {
        let mut mentions = Vec::new();

        if self == DocumentKind::Quote {
            if let (Some(days), Some(until)) = (meta.validity_days, validity_end(meta)) {
                mentions.push(format!(
                    "Devis valable {days} jours à compter de sa date d'émission, soit jusqu'au {}.",
                    format_date(until)
                ));
            }
        }

        if let Some(terms) = meta.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
            mentions.push(format!("Conditions de paiement : {}", terms.trim()));
        }

        if self == DocumentKind::Invoice {
            // Printed even next to custom payment terms.
            mentions.push(format!("Date d'échéance : {}", format_date(due_date(meta))));
            mentions.push(NO_EARLY_PAYMENT_DISCOUNT.to_string());
        }

        if meta.recipient_type == RecipientType::Business {
            let late_fees = meta
                .late_fees_text
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(DEFAULT_LATE_FEES);
            mentions.push(late_fees.to_string());
            mentions.push(RECOVERY_INDEMNITY.to_string());
        }

        if self == DocumentKind::Quote {
            mentions.push(QUOTE_ACCEPTANCE.to_string());
        }

        mentions
    }
}

/// Explicit due date, else issue date + 30 days.
pub fn due_date(meta: &DocumentMeta) -> NaiveDate {
    meta.due_date.unwrap_or_else(|| {
        meta.issue_date
            .checked_add_days(Days::new(DEFAULT_PAYMENT_DELAY_DAYS))
            .unwrap_or(meta.issue_date)
    })
}

/// Last day a quote can be accepted.
pub fn validity_end(meta: &DocumentMeta) -> Option<NaiveDate> {
    meta.validity_days
        .and_then(|days| meta.issue_date.checked_add_days(Days::new(days as u64)))
}

/// `dd/mm/yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
