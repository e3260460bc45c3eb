//! forge – command-line quote/invoice renderer.
//!
//! Usage:
//!   forge <request.json> [output.pdf] [--landscape] [--config cfg.json]
//!         [--layout layout.json] [--accent "#1e3a5f"]
//!   forge --sample quote|invoice|exempt [output.pdf] [...]
//!
//! If `output.pdf` is omitted the PDF is named after the document number
//! (e.g. `FAC 2024/003` → `FAC_2024_003.pdf`), next to the request file.

use std::{env, fs, path::Path, path::PathBuf, process};

use devis_forge::model::DocumentRequest;
use devis_forge::pipeline::{generate_pdf, PageOrientation, PipelineConfig};
use devis_forge::style::Color;
use devis_forge::templates;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut layout_path: Option<PathBuf> = None;
    let mut sample: Option<String> = None;
    let mut accent: Option<String> = None;
    let mut landscape = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--landscape" | "-l" => landscape = true,
            "--config" | "-c" => config_path = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--layout" => layout_path = Some(PathBuf::from(flag_value(&mut iter, arg, &args[0]))),
            "--sample" => sample = Some(flag_value(&mut iter, arg, &args[0])),
            "--accent" => accent = Some(flag_value(&mut iter, arg, &args[0])),
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                // With --sample the only positional is the output path.
                let slots = if sample.is_some() { 1 } else { 2 };
                if positional >= slots {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                if positional == 0 && sample.is_none() {
                    input_path = Some(PathBuf::from(path));
                } else {
                    output_path = Some(PathBuf::from(path));
                }
                positional += 1;
            }
        }
    }

    let request = match (&sample, &input_path) {
        (Some(name), _) => match name.as_str() {
            "quote" => templates::sample_quote(),
            "invoice" => templates::sample_invoice(),
            "exempt" => templates::sample_exempt_invoice(),
            other => fail(&format!("unknown sample '{other}' (expected quote, invoice or exempt)")),
        },
        (None, Some(input)) => read_request(input),
        (None, None) => {
            eprintln!("Error: no request file specified.");
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    let mut config = match &config_path {
        Some(path) => PipelineConfig::from_json_file(path)
            .unwrap_or_else(|e| fail(&format!("cannot load config '{}': {e}", path.display()))),
        None => PipelineConfig::default(),
    };
    if landscape {
        config.orientation = PageOrientation::Landscape;
    }
    if let Some(hex) = &accent {
        config.theme.accent =
            Color::from_hex(hex).unwrap_or_else(|| fail(&format!("invalid colour '{hex}'")));
    }

    // Default output: named after the document, next to the request file.
    let output = output_path.unwrap_or_else(|| {
        let dir = input_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default();
        dir.join(format!("{}.pdf", request.meta.file_stem()))
    });

    let doc = generate_pdf(&request, &config)
        .unwrap_or_else(|e| fail(&format!("generating PDF: {e}")));

    write_file(&output, &doc.bytes);
    if let Some(path) = &layout_path {
        write_file(path, doc.layout.to_json().as_bytes());
    }
    eprintln!(
        "Wrote '{}' ({} bytes, {} page{})",
        output.display(),
        doc.bytes.len(),
        doc.page_count,
        if doc.page_count == 1 { "" } else { "s" }
    );
}

fn flag_value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str, prog: &str) -> String {
    match iter.next() {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {flag}");
            print_usage(prog);
            process::exit(1);
        }
    }
}

fn read_request(path: &Path) -> DocumentRequest {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("reading '{}': {e}", path.display())));
    DocumentRequest::from_json(&json)
        .unwrap_or_else(|e| fail(&format!("parsing '{}': {e}", path.display())))
}

fn write_file(path: &Path, bytes: &[u8]) {
    // Create output directory if necessary.
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(parent) {
                fail(&format!("creating output directory: {e}"));
            }
        }
    }
    if let Err(e) = fs::write(path, bytes) {
        fail(&format!("writing '{}': {e}", path.display()));
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{}", error_line(msg));
    process::exit(1);
}

fn error_line(msg: &str) -> String {
    format!("Error: {msg}")
}

fn print_usage(prog: &str) {
    eprintln!("forge – quote and invoice PDF renderer (devis-forge)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <request.json> [output.pdf] [flags]");
    eprintln!("  {prog} --sample quote|invoice|exempt [output.pdf] [flags]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <request.json>  Document request (camelCase JSON)");
    eprintln!("  [output.pdf]    Output path (default: <document number>.pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --config, -c    Pipeline config JSON (page size, theme, fonts, ...)");
    eprintln!("  --layout        Also write the computed layout JSON to this path");
    eprintln!("  --sample        Render a built-in sample instead of a request file");
    eprintln!("  --accent        Accent colour as #rrggbb");
    eprintln!("  --landscape     Use landscape page orientation (A4 841×595 pt)");
    eprintln!("  --help          Print this message");
}
