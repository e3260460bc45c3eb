//! C-compatible FFI API for cross-language bindings.
//!
//! # ABI Contract
//!
//! All exported functions use `extern "C"` calling convention and `#[no_mangle]`
//! to ensure stable symbol names. Document requests cross the boundary as
//! UTF-8 JSON (camelCase keys, dates as `YYYY-MM-DD`).
//!
//! ## Memory management
//! - Buffers returned by `dvf_*` functions are allocated on the Rust heap.
//! - Callers **must** free them with `dvf_free_buffer` / `dvf_free_string`.
//! - Passing a null pointer to a free function is a no-op.
//!
//! ## Error handling
//! - Functions that can fail return a `c_int` (0 = success, non-zero = error).
//!   `1` null argument, `2` invalid UTF-8, `3` invalid request or layout
//!   JSON, `4` generation failure.
//! - Error details can be retrieved via `dvf_last_error`.
//!
//! ## Thread safety
//! - Every call owns its own document state; `dvf_last_error` uses a
//!   thread-local, so concurrent calls from several threads are safe.
//!
//! ## Usage from Go (cgo)
//! ```go
//! // #cgo LDFLAGS: -ldevis_forge
//! // #include <stdint.h>
//! // extern int dvf_generate_pdf(const uint8_t* json, uint32_t json_len,
//! //                             uint8_t** out_buf, uint32_t* out_len);
//! // extern void dvf_free_buffer(uint8_t* buf, uint32_t len);
//! // extern const char* dvf_last_error();
//! import "C"
//! ```

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::ptr;
use std::slice;

use crate::error::ForgeError;
use crate::layout_config::LayoutConfig;
use crate::model::DocumentRequest;
use crate::pipeline::{
    compute_layout_config, generate_pdf, load_fonts, PageOrientation, PipelineConfig,
    RenderedDocument,
};
use crate::render::render_pdf;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = RefCell::new(None);
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg.replace('\0', " ")).ok();
    });
}

// ---------------------------------------------------------------------------
// C-compatible configuration types
// ---------------------------------------------------------------------------

/// Page orientation for use in [`DvfPipelineConfig`].
#[repr(C)]
pub enum DvfPageOrientation {
    /// Portrait mode: height > width (default).
    Portrait = 0,
    /// Landscape mode: width > height.
    Landscape = 1,
}

/// Optional configuration passed to the `*_ex` functions.
///
/// Fields set to `0` fall back to their defaults:
/// - `page_width`  → 595.28 pt (A4)
/// - `page_height` → 841.89 pt (A4)
/// - `page_margin` → 40 pt
/// - `footer_zone` → 36 pt
#[repr(C)]
pub struct DvfPipelineConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub page_margin: f32,
    pub footer_zone: f32,
    /// Page orientation (portrait = 0, landscape = 1).
    pub orientation: DvfPageOrientation,
}

fn pipeline_config_from_c(cfg: &DvfPipelineConfig) -> PipelineConfig {
    let defaults = PipelineConfig::default();
    let or_default = |value: f32, default: f32| if value == 0.0 { default } else { value };

    PipelineConfig {
        page_width: or_default(cfg.page_width, defaults.page_width),
        page_height: or_default(cfg.page_height, defaults.page_height),
        page_margin: or_default(cfg.page_margin, defaults.page_margin),
        footer_zone: or_default(cfg.footer_zone, defaults.footer_zone),
        orientation: match cfg.orientation {
            DvfPageOrientation::Portrait => PageOrientation::Portrait,
            DvfPageOrientation::Landscape => PageOrientation::Landscape,
        },
        ..defaults
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Borrow and decode the JSON request, mapping failures to return codes.
///
/// # Safety
/// `json_ptr` must point to `json_len` valid bytes.
unsafe fn read_request(json_ptr: *const u8, json_len: u32) -> Result<DocumentRequest, c_int> {
    let bytes = slice::from_raw_parts(json_ptr, json_len as usize);
    let json = std::str::from_utf8(bytes).map_err(|e| {
        set_last_error(&format!("Invalid UTF-8: {e}"));
        2
    })?;
    DocumentRequest::from_json(json).map_err(|e| {
        set_last_error(&e.to_string());
        3
    })
}

/// # Safety
/// `cfg`, if non-null, must point to a valid [`DvfPipelineConfig`].
unsafe fn config_or_default(cfg: *const DvfPipelineConfig) -> PipelineConfig {
    if cfg.is_null() {
        PipelineConfig::default()
    } else {
        pipeline_config_from_c(&*cfg)
    }
}

/// # Safety
/// `out_buf` and `out_len` must be valid pointers.
unsafe fn hand_over_bytes(bytes: Vec<u8>, out_buf: *mut *mut u8, out_len: *mut u32) {
    let len = bytes.len() as u32;
    let buf = bytes.into_boxed_slice();
    *out_buf = Box::into_raw(buf) as *mut u8;
    *out_len = len;
}

fn json_to_c(json: String) -> Result<*mut c_char, c_int> {
    CString::new(json).map(CString::into_raw).map_err(|_| {
        set_last_error("JSON contained null byte");
        4
    })
}

fn generation_failed(e: ForgeError) -> c_int {
    set_last_error(&e.to_string());
    4
}

/// # Safety
/// All pointers must be valid; `out_json_ptr` may be null when no layout is
/// wanted.
unsafe fn generate_into(
    json_ptr: *const u8,
    json_len: u32,
    config: &PipelineConfig,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    let request = match read_request(json_ptr, json_len) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let RenderedDocument { bytes, layout, .. } = match generate_pdf(&request, config) {
        Ok(doc) => doc,
        Err(e) => return generation_failed(e),
    };
    if !out_json_ptr.is_null() {
        match json_to_c(layout.to_json()) {
            Ok(p) => *out_json_ptr = p,
            Err(code) => return code,
        }
    }
    hand_over_bytes(bytes, out_buf, out_len);
    0
}

// ---------------------------------------------------------------------------
// Core API
// ---------------------------------------------------------------------------

/// Generate a PDF from a JSON document request.
///
/// # Parameters
/// - `json_ptr`: pointer to UTF-8 JSON bytes (not necessarily null-terminated)
/// - `json_len`: length of the JSON data in bytes
/// - `out_buf`: on success, receives a pointer to heap-allocated PDF bytes
/// - `out_len`: on success, receives the length of the PDF buffer
///
/// # Returns
/// `0` on success, non-zero on error. On error, call `dvf_last_error`.
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `out_buf` and `out_len` must be valid pointers.
/// - The caller must free `*out_buf` by calling `dvf_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn dvf_generate_pdf(
    json_ptr: *const u8,
    json_len: u32,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    dvf_generate_pdf_ex(json_ptr, json_len, ptr::null(), out_buf, out_len)
}

/// Generate a PDF and also return the layout config JSON.
///
/// # Safety
/// Same as `dvf_generate_pdf`. Additionally, `*out_json_ptr` must be freed
/// with `dvf_free_string`.
#[no_mangle]
pub unsafe extern "C" fn dvf_generate_pdf_with_layout(
    json_ptr: *const u8,
    json_len: u32,
    out_pdf_buf: *mut *mut u8,
    out_pdf_len: *mut u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if json_ptr.is_null() || out_pdf_buf.is_null() || out_pdf_len.is_null() || out_json_ptr.is_null()
    {
        set_last_error("Null pointer argument");
        return 1;
    }
    generate_into(
        json_ptr,
        json_len,
        &PipelineConfig::default(),
        out_pdf_buf,
        out_pdf_len,
        out_json_ptr,
    )
}

/// Compute only the layout config (no PDF rendering). Returns JSON.
///
/// # Safety
/// `json_ptr` must point to `json_len` valid bytes; `*out_json_ptr` must be
/// freed with `dvf_free_string`.
#[no_mangle]
pub unsafe extern "C" fn dvf_compute_layout(
    json_ptr: *const u8,
    json_len: u32,
    out_json_ptr: *mut *mut c_char,
) -> c_int {
    if json_ptr.is_null() || out_json_ptr.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }
    let request = match read_request(json_ptr, json_len) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let config = PipelineConfig::default();
    let layout = match compute_layout_config(&request, &config, &config.logo_source()) {
        Ok(l) => l,
        Err(e) => return generation_failed(e),
    };
    match json_to_c(layout.to_json()) {
        Ok(p) => {
            *out_json_ptr = p;
            0
        }
        Err(code) => code,
    }
}

/// Generate a PDF with a custom [`DvfPipelineConfig`].
///
/// # Safety
/// - `json_ptr` must point to `json_len` valid bytes.
/// - `cfg`, if non-null, must be a valid pointer to a fully-initialised
///   [`DvfPipelineConfig`]; pass `NULL` for defaults.
/// - The caller must free `*out_buf` with `dvf_free_buffer`.
#[no_mangle]
pub unsafe extern "C" fn dvf_generate_pdf_ex(
    json_ptr: *const u8,
    json_len: u32,
    cfg: *const DvfPipelineConfig,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }
    let config = config_or_default(cfg);
    generate_into(json_ptr, json_len, &config, out_buf, out_len, ptr::null_mut())
}

/// Render a PDF from a layout config JSON string, using builtin fonts.
///
/// This allows pre-computing the layout and rendering separately.
///
/// # Safety
/// `json_ptr` must be a valid null-terminated string; `out_buf`/`out_len`
/// must be valid pointers.
#[no_mangle]
pub unsafe extern "C" fn dvf_render_from_layout(
    json_ptr: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut u32,
) -> c_int {
    if json_ptr.is_null() || out_buf.is_null() || out_len.is_null() {
        set_last_error("Null pointer argument");
        return 1;
    }

    let json = match CStr::from_ptr(json_ptr).to_str() {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Invalid UTF-8 in JSON: {e}"));
            return 2;
        }
    };

    let layout_config = match LayoutConfig::from_json(json) {
        Ok(c) => c,
        Err(e) => {
            set_last_error(&format!("Invalid layout JSON: {e}"));
            return 3;
        }
    };

    let rendered = load_fonts(&PipelineConfig::default())
        .and_then(|fonts| render_pdf(&layout_config, &fonts));
    match rendered {
        Ok(pdf_bytes) => {
            hand_over_bytes(pdf_bytes, out_buf, out_len);
            0
        }
        Err(e) => generation_failed(e),
    }
}

// ---------------------------------------------------------------------------
// Memory management
// ---------------------------------------------------------------------------

/// Free a PDF buffer returned by `dvf_generate_pdf` (or similar).
///
/// # Safety
/// `buf` must have been returned by a previous `dvf_*` call, and `len` must
/// be the corresponding length.
#[no_mangle]
pub unsafe extern "C" fn dvf_free_buffer(buf: *mut u8, len: u32) {
    if !buf.is_null() {
        let _ = Box::from_raw(slice::from_raw_parts_mut(buf, len as usize));
    }
}

/// Free a layout JSON string.
///
/// # Safety
/// `s` must have been returned by a `dvf_*` function that hands out JSON.
#[no_mangle]
pub unsafe extern "C" fn dvf_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}

/// Retrieve the last error message. Returns a null-terminated string.
///
/// The returned pointer is valid until the next failing `dvf_*` call on the
/// same thread. The caller should **not** free this pointer.
///
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn dvf_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        let borrow = e.borrow();
        match borrow.as_ref() {
            Some(cs) => cs.as_ptr(),
            None => ptr::null(),
        }
    })
}

/// Return the library version as a null-terminated string.
/// The caller must **not** free this pointer.
#[no_mangle]
pub extern "C" fn dvf_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    fn request_json() -> Vec<u8> {
        serde_json::to_vec(&templates::sample_invoice()).unwrap()
    }

    #[test]
    fn ffi_generate_pdf() {
        let json = request_json();
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe {
            dvf_generate_pdf(json.as_ptr(), json.len() as u32, &mut out_buf, &mut out_len)
        };

        assert_eq!(rc, 0, "Expected success");
        assert!(!out_buf.is_null());
        assert!(out_len > 100);

        let bytes = unsafe { slice::from_raw_parts(out_buf, out_len as usize) };
        assert_eq!(&bytes[0..5], b"%PDF-");

        unsafe { dvf_free_buffer(out_buf, out_len) };
    }

    #[test]
    fn ffi_generate_with_layout_then_rerender() {
        let json = request_json();
        let mut pdf: *mut u8 = ptr::null_mut();
        let mut pdf_len: u32 = 0;
        let mut layout: *mut c_char = ptr::null_mut();

        let rc = unsafe {
            dvf_generate_pdf_with_layout(
                json.as_ptr(),
                json.len() as u32,
                &mut pdf,
                &mut pdf_len,
                &mut layout,
            )
        };
        assert_eq!(rc, 0);
        assert!(!layout.is_null());

        let mut again: *mut u8 = ptr::null_mut();
        let mut again_len: u32 = 0;
        let rc = unsafe { dvf_render_from_layout(layout, &mut again, &mut again_len) };
        assert_eq!(rc, 0);
        let bytes = unsafe { slice::from_raw_parts(again, again_len as usize) };
        assert_eq!(&bytes[0..5], b"%PDF-");

        unsafe {
            dvf_free_buffer(pdf, pdf_len);
            dvf_free_buffer(again, again_len);
            dvf_free_string(layout);
        }
    }

    #[test]
    fn ffi_compute_layout() {
        let json = request_json();
        let mut json_ptr: *mut c_char = ptr::null_mut();

        let rc = unsafe { dvf_compute_layout(json.as_ptr(), json.len() as u32, &mut json_ptr) };

        assert_eq!(rc, 0);
        assert!(!json_ptr.is_null());

        let layout = unsafe { CStr::from_ptr(json_ptr) }.to_str().unwrap();
        assert!(layout.contains("pages"));
        assert!(layout.contains("page_width_pt"));
        assert!(layout.contains("PageMarker"));

        unsafe { dvf_free_string(json_ptr) };
    }

    #[test]
    fn ffi_null_input() {
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe { dvf_generate_pdf(ptr::null(), 0, &mut out_buf, &mut out_len) };

        assert_eq!(rc, 1, "Should fail on null input");
    }

    #[test]
    fn ffi_invalid_request_sets_last_error() {
        let json = br#"{ "kind": "receipt" }"#;
        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;

        let rc = unsafe {
            dvf_generate_pdf(json.as_ptr(), json.len() as u32, &mut out_buf, &mut out_len)
        };
        assert_eq!(rc, 3);
        assert!(out_buf.is_null());
        let msg = unsafe { CStr::from_ptr(dvf_last_error()) }.to_str().unwrap();
        assert!(msg.starts_with("invalid request"), "{msg}");
    }

    #[test]
    fn ffi_version() {
        let v = dvf_version();
        let version = unsafe { CStr::from_ptr(v) }.to_str().unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn ffi_compute_layout_ex_landscape() {
        let json = request_json();
        let cfg = DvfPipelineConfig {
            page_width: 0.0,
            page_height: 0.0,
            page_margin: 30.0,
            footer_zone: 0.0,
            orientation: DvfPageOrientation::Landscape,
        };
        let config = pipeline_config_from_c(&cfg);
        assert_eq!(config.effective_width(), 841.89);
        assert_eq!(config.page_margin, 30.0);
        assert_eq!(config.footer_zone, 36.0);

        let mut out_buf: *mut u8 = ptr::null_mut();
        let mut out_len: u32 = 0;
        let rc = unsafe {
            dvf_generate_pdf_ex(json.as_ptr(), json.len() as u32, &cfg, &mut out_buf, &mut out_len)
        };
        assert_eq!(rc, 0);
        unsafe { dvf_free_buffer(out_buf, out_len) };
    }
}
