//! FFI bindings for Synheart Mudra
//!
//! This module provides C-compatible functions for driving a session from other
//! languages. All functions use C strings (null-terminated) and return allocated
//! memory that must be freed by the caller using `mudra_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::catalogue::Catalogue;
use crate::config::SessionConfig;
use crate::gesture::GestureClassifier;
use crate::pipeline::{frames_to_states, MudraSession};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Helper to convert Rust string to C string (caller must free)
fn string_to_cstr(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cstr) => cstr.into_raw(),
        Err(_) => ptr::null_mut(),
    }
}

/// Read an optional configuration document; NULL means defaults
unsafe fn config_from_ptr(config_json: *const c_char) -> Result<SessionConfig, String> {
    if config_json.is_null() {
        return Ok(SessionConfig::default());
    }
    let json = cstr_to_string(config_json).ok_or("Invalid config string pointer")?;
    SessionConfig::from_json(&json).map_err(|e| e.to_string())
}

// ============================================================================
// Stateless API
// ============================================================================

/// Process a JSON array of frame records and return a JSON array of state payloads.
///
/// # Safety
/// - `frames_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `mudra_free_string`.
/// - Returns NULL on error; call `mudra_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mudra_frames_to_states(frames_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let json_str = match cstr_to_string(frames_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match frames_to_states(json_str) {
        // Each payload is already valid JSON
        Ok(payloads) => string_to_cstr(&format!("[{}]", payloads.join(","))),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the display catalogue as JSON.
///
/// # Safety
/// - `config_json` must be NULL or a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `mudra_free_string`.
/// - Returns NULL on error; call `mudra_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mudra_catalogue(config_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let config = match config_from_ptr(config_json) {
        Ok(config) => config,
        Err(msg) => {
            set_last_error(&msg);
            return ptr::null_mut();
        }
    };

    let catalogue = Catalogue::new(&GestureClassifier::new(config.gesture));
    match catalogue.to_json() {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateful Session API
// ============================================================================

/// Opaque handle to a MudraSession
pub struct MudraSessionHandle {
    session: MudraSession,
}

/// Create a new session.
///
/// # Safety
/// - `config_json` must be NULL (defaults) or a valid null-terminated C string.
/// - Returns a pointer to a newly allocated session.
/// - Must be freed with `mudra_session_free`.
/// - Returns NULL on error; call `mudra_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mudra_session_new(config_json: *const c_char) -> *mut MudraSessionHandle {
    clear_last_error();

    let session = config_from_ptr(config_json)
        .and_then(|config| MudraSession::with_config(config).map_err(|e| e.to_string()));

    match session {
        Ok(session) => Box::into_raw(Box::new(MudraSessionHandle { session })),
        Err(msg) => {
            set_last_error(&msg);
            ptr::null_mut()
        }
    }
}

/// Free a session.
///
/// # Safety
/// - `session` must be a valid pointer returned by `mudra_session_new`, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn mudra_session_free(session: *mut MudraSessionHandle) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Process one JSON frame record and return the JSON state payload.
///
/// # Safety
/// - `session` must be a valid pointer returned by `mudra_session_new`.
/// - `frame_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `mudra_free_string`.
/// - Returns NULL on error; call `mudra_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mudra_session_process_frame(
    session: *mut MudraSessionHandle,
    frame_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &mut *session;

    let json_str = match cstr_to_string(frame_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid JSON string pointer");
            return ptr::null_mut();
        }
    };

    match handle.session.process_json(&json_str) {
        Ok(payload) => string_to_cstr(&payload),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

/// Get the session summary as JSON.
///
/// # Safety
/// - `session` must be a valid pointer returned by `mudra_session_new`.
/// - Returns a newly allocated string that must be freed with `mudra_free_string`.
/// - Returns NULL on error; call `mudra_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn mudra_session_summary(session: *const MudraSessionHandle) -> *mut c_char {
    clear_last_error();

    if session.is_null() {
        set_last_error("Null session pointer");
        return ptr::null_mut();
    }

    let handle = &*session;

    match serde_json::to_string(&handle.session.summary()) {
        Ok(json) => string_to_cstr(&json),
        Err(e) => {
            set_last_error(&e.to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by Mudra functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a Mudra function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn mudra_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next Mudra function call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn mudra_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

// ============================================================================
// Version Information
// ============================================================================

/// Get the Mudra library version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn mudra_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
