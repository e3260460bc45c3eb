//! Sample document requests for the CLI `--sample` flag and for tests.
//!
//! Each sample exercises a different path: a business quote with a
//! discounted line and validity, a standard-rate invoice with notes, and a
//! VAT-exempt invoice.

use chrono::NaiveDate;

use crate::kind::DocumentKind;
use crate::model::{DocumentMeta, DocumentRequest, LineItem, Party, RecipientType, TaxMode};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn issuer() -> Party {
    Party {
        name: Some("Julien Moreau".into()),
        company_name: Some("Moreau Plomberie Chauffage".into()),
        address: Some("14 rue des Tanneurs\n69007 Lyon".into()),
        phone: Some("06 71 42 18 90".into()),
        email: Some("contact@moreau-plomberie.fr".into()),
        tax_id: Some("812 345 678 00021".into()),
        logo_url: None,
    }
}

fn individual() -> Party {
    Party {
        name: Some("Claire Bernard".into()),
        address: Some("5 impasse des Glycines, 69160 Tassin-la-Demi-Lune".into()),
        phone: Some("07 12 34 56 78".into()),
        email: Some("claire.bernard@example.fr".into()),
        ..Party::default()
    }
}

fn business() -> Party {
    Party {
        name: Some("Sophie Lambert".into()),
        company_name: Some("SCI Les Terrasses du Rhône".into()),
        address: Some("22 quai Claude Bernard, bâtiment C, 69007 Lyon".into()),
        email: Some("gestion@terrasses-rhone.fr".into()),
        phone: Some("04 78 00 00 00".into()),
        tax_id: Some("901 234 567 00015".into()),
        logo_url: None,
    }
}

/// Business quote: discounted line, two VAT rates, 30-day validity.
pub fn sample_quote() -> DocumentRequest {
    let mut meta = DocumentMeta::new("DEV-2024-0042", date(2024, 3, 4));
    meta.recipient_type = RecipientType::Business;
    meta.validity_days = Some(30);
    meta.payment_terms = Some("acompte de 30 % à la commande, solde à réception".into());

    DocumentRequest {
        kind: DocumentKind::Quote,
        issuer: issuer(),
        recipient: business(),
        meta,
        items: vec![
            LineItem::new("Chaudière gaz à condensation 25 kW", 1.0, 2890.0, 5.5)
                .with_description("Fourniture et pose, raccordement fumées\nMise en service et réglages")
                .with_unit("u"),
            LineItem::new("Désembouage du circuit", 1.0, 420.0, 10.0)
                .with_unit("forfait")
                .with_discount(10.0),
            LineItem::new("Main d'oeuvre", 6.5, 55.0, 10.0).with_unit("h"),
        ],
        logo_url: None,
    }
}

/// Invoice to an individual, standard VAT, with notes.
pub fn sample_invoice() -> DocumentRequest {
    let mut meta = DocumentMeta::new("FAC-2024-0107", date(2024, 4, 12));
    meta.service_date = Some(date(2024, 4, 10));
    meta.payment_terms = Some("à réception de facture".into());
    meta.notes = Some("Intervention réalisée en présence du client.\nGarantie pièces : 2 ans.".into());

    DocumentRequest {
        kind: DocumentKind::Invoice,
        issuer: issuer(),
        recipient: individual(),
        meta,
        items: vec![
            LineItem::new("Recherche de fuite", 1.0, 100.0, 20.0)
                .with_description("Caméra thermique et test de pression"),
            LineItem::new("Remplacement siphon", 2.0, 50.0, 20.0).with_unit("u"),
        ],
        logo_url: None,
    }
}

/// Same work billed under the VAT franchise regime.
pub fn sample_exempt_invoice() -> DocumentRequest {
    let mut request = sample_invoice();
    request.meta.document_number = "FAC-2024-0108".into();
    request.meta.tax_mode = TaxMode::Exempt;
    request
}

/// Invoice with `count` lines, each carrying a three-line description.
pub fn long_invoice(count: usize) -> DocumentRequest {
    let mut request = sample_invoice();
    request.meta.document_number = "FAC-2024-0200".into();
    request.meta.notes = None;
    request.items = (1..=count)
        .map(|i| {
            LineItem::new(&format!("Poste {i}"), 1.0, 10.0, 20.0)
                .with_description("Ligne 1\nLigne 2\nLigne 3")
        })
        .collect();
    request
}
