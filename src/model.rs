//! Request model – the typed shape of everything a caller hands to the
//! pipeline: issuer and recipient parties, document metadata and the ordered
//! line items.
//!
//! Every field the upstream application may leave blank is an `Option`, so
//! section renderers decide presence with `if let` instead of probing a
//! loosely-typed record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::kind::DocumentKind;

/// One billable row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Short single-line title.
    pub label: String,
    /// Optional detail, word-wrapped under the label.
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: f64,
    /// Free-text unit ("h", "m²", "forfait", ...).
    #[serde(default)]
    pub unit: String,
    /// Net of tax.
    pub unit_price: f64,
    #[serde(default)]
    pub discount_percent: f64,
    /// Ignored when the document is tax-exempt.
    #[serde(default)]
    pub tax_rate_percent: f64,
}

impl LineItem {
    /// Convenience constructor for an undiscounted row without description.
    pub fn new(label: &str, quantity: f64, unit_price: f64, tax_rate_percent: f64) -> Self {
        Self {
            label: label.to_string(),
            description: None,
            quantity,
            unit: String::new(),
            unit_price,
            discount_percent: 0.0,
            tax_rate_percent,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn with_discount(mut self, discount_percent: f64) -> Self {
        self.discount_percent = discount_percent;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaxMode {
    #[default]
    Standard,
    /// VAT franchise: no tax column, no tax rows, a fixed disclaimer instead.
    Exempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecipientType {
    #[default]
    Individual,
    /// Enables the late-payment penalty and recovery indemnity mentions.
    Business,
}

/// Metadata of one quote or one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub document_number: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub service_date: Option<NaiveDate>,
    #[serde(default)]
    pub tax_mode: TaxMode,
    #[serde(default)]
    pub recipient_type: RecipientType,
    /// Quotes only.
    #[serde(default)]
    pub validity_days: Option<u32>,
    /// Overrides the computed issue date + 30 days on invoices.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub late_fees_text: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DocumentMeta {
    pub fn new(document_number: &str, issue_date: NaiveDate) -> Self {
        Self {
            document_number: document_number.to_string(),
            issue_date,
            service_date: None,
            tax_mode: TaxMode::Standard,
            recipient_type: RecipientType::Individual,
            validity_days: None,
            due_date: None,
            payment_terms: None,
            late_fees_text: None,
            notes: None,
        }
    }

    /// Storage-safe stem derived from the document number: anything outside
    /// `[A-Za-z0-9_-]` becomes `_`.
    pub fn file_stem(&self) -> String {
        let stem: String = self
            .document_number
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "document".to_string()
        } else {
            stem
        }
    }
}

/// Issuer profile or recipient record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// SIRET or equivalent registration number.
    pub tax_id: Option<String>,
    /// Issuer only: URL, file path or `data:` URI of a PNG/JPEG logo.
    pub logo_url: Option<String>,
}

impl Party {
    /// Company name when set, otherwise the person's name.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.name.as_deref())
            .unwrap_or("")
    }

    /// The person's name when it differs from the displayed company name.
    pub fn contact_name(&self) -> Option<&str> {
        match (&self.company_name, &self.name) {
            (Some(company), Some(name)) if !company.trim().is_empty() && company != name => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

/// Everything needed to lay out one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub issuer: Party,
    pub recipient: Party,
    pub meta: DocumentMeta,
    /// Display order is insertion order.
    pub items: Vec<LineItem>,
    /// Takes precedence over `issuer.logo_url`.
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl DocumentRequest {
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn logo_location(&self) -> Option<&str> {
        self.logo_url
            .as_deref()
            .or(self.issuer.logo_url.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}
