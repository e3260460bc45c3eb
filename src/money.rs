//! Money and line arithmetic.
//!
//! Every amount shown on a document is derived from [`line_net`]: the items
//! table prints it per row and [`totals`] sums the very same values, so the
//! table and the totals box can never drift apart through a second rounding
//! path. Rounding happens only when formatting.

use std::collections::BTreeMap;

use crate::model::{LineItem, TaxMode};

/// A tax rate in hundredths of a percent (`20 %` → `2000`, `5.5 %` → `550`).
///
/// `f64` is not `Ord`, so rates are keyed on this fixed-point value to get a
/// deterministic ascending order in [`TaxBuckets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RateKey(i64);

impl RateKey {
    pub fn from_percent(rate: f64) -> Self {
        Self((rate * 100.0).round() as i64)
    }

    pub fn percent(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Accumulated tax per distinct rate.
pub type TaxBuckets = BTreeMap<RateKey, f64>;

/// `quantity × unit price × (1 − discount/100)`.
pub fn line_net(item: &LineItem) -> f64 {
    item.quantity * item.unit_price * (1.0 - item.discount_percent / 100.0)
}

/// Tax owed on one line under `tax_mode` (always 0 when exempt).
pub fn line_tax(item: &LineItem, tax_mode: TaxMode) -> f64 {
    match tax_mode {
        TaxMode::Standard => line_net(item) * item.tax_rate_percent / 100.0,
        TaxMode::Exempt => 0.0,
    }
}

/// Add one item's tax to its rate bucket. Exempt documents leave the buckets
/// untouched whatever rate the item carries.
pub fn accumulate_tax(mut buckets: TaxBuckets, item: &LineItem, tax_mode: TaxMode) -> TaxBuckets {
    if tax_mode == TaxMode::Standard {
        *buckets
            .entry(RateKey::from_percent(item.tax_rate_percent))
            .or_insert(0.0) += line_tax(item, tax_mode);
    }
    buckets
}

/// Document totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub total_ht: f64,
    pub total_tva: f64,
    pub total_ttc: f64,
    /// `(rate percent, tax amount)` in ascending rate order.
    pub per_rate: Vec<(f64, f64)>,
}

pub fn totals(items: &[LineItem], tax_mode: TaxMode) -> Totals {
    let total_ht: f64 = items.iter().map(line_net).sum();
    let buckets = items
        .iter()
        .fold(TaxBuckets::new(), |acc, item| accumulate_tax(acc, item, tax_mode));
    let per_rate: Vec<(f64, f64)> = buckets
        .iter()
        .map(|(rate, amount)| (rate.percent(), *amount))
        .collect();
    let total_tva: f64 = per_rate.iter().map(|(_, amount)| amount).sum();

    Totals {
        total_ht,
        total_tva,
        total_ttc: total_ht + total_tva,
        per_rate,
    }
}

/// `1234.5` → `"1 234,50 €"`.
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{sign}{},{:02} €",
        group_thousands(cents / 100),
        cents % 100
    )
}

/// `20.0` → `"20 %"`, `5.5` → `"5,5 %"`.
pub fn format_percent(rate: f64) -> String {
    format!("{} %", format_decimal(rate, 2))
}

/// `2.0` → `"2"`, `1.25` → `"1,25"`.
pub fn format_quantity(quantity: f64) -> String {
    format_decimal(quantity, 3)
}

/// French decimal notation with trailing zeros trimmed.
fn format_decimal(value: f64, max_decimals: usize) -> String {
    let s = format!("{value:.max_decimals$}");
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s.replace('.', ",")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}
