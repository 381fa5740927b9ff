//! C-ABI wrapper around `restclient-core`.
//!
//! # Overview
//! Lets device firmware written in C create a REST client and send GET,
//! POST, PUT and DELETE requests through `extern "C"` functions.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Request functions return an `FfiErrorCode`. The message for the last
//!   failure stays on the handle until the next request.
//! - `rest_client_send` takes the method as an integer, which is where an
//!   unset or unknown method is rejected.
//! - The C caller owns the handle and any string returned by
//!   `rest_client_last_error_message`, and releases them with
//!   `rest_client_free` and `rest_free_string`.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use restclient_core::{ClientError, HttpMethod, HttpRequest, RestClient};

use types::*;

/// Borrow a C string as `&str`, mapping null and invalid UTF-8 to error
/// codes.
fn borrow_str<'a>(ptr: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if ptr.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidUtf8)
}

/// Record the outcome of a request on the handle and convert it to a code.
fn finish(client: &FfiRestClient, result: Result<(), ClientError>) -> FfiErrorCode {
    match result {
        Ok(()) => {
            client.clear_last_error();
            FfiErrorCode::Ok
        }
        Err(err) => {
            tracing::debug!(error = %err, "request failed");
            client.set_last_error(&err.to_string());
            FfiErrorCode::from(&err)
        }
    }
}

/// Whether a null body is rejected up front or passed on to the core.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BodyArg {
    Required,
    Optional,
}

/// Build and send one request, recording the outcome on the handle.
fn dispatch(
    client: *const FfiRestClient,
    method: i32,
    resource: *const c_char,
    body: *const c_char,
    body_arg: BodyArg,
) -> FfiErrorCode {
    if client.is_null() {
        return FfiErrorCode::NullArg;
    }
    let client = unsafe { &*client };

    let method = match HttpMethod::try_from(method) {
        Ok(m) => m,
        Err(err) => return finish(client, Err(err)),
    };
    let resource = match borrow_str(resource) {
        Ok(r) => r,
        Err(code) => {
            client.set_last_error("resource must be a non-null UTF-8 string");
            return code;
        }
    };
    let body = if body.is_null() && body_arg == BodyArg::Optional {
        None
    } else {
        match borrow_str(body) {
            Ok(b) => Some(b),
            Err(code) => {
                client.set_last_error("body must be a non-null UTF-8 string");
                return code;
            }
        }
    };

    let request = HttpRequest::new(method, resource, body);
    finish(client, client.inner.send(&request))
}

/// Store `code` through `status` when the caller asked for it.
fn report(status: *mut FfiErrorCode, code: FfiErrorCode) {
    if !status.is_null() {
        unsafe { status.write(code) };
    }
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Resolve `host` and create a client bound to the first reachable address.
///
/// Returns null if `host` is null or not UTF-8, if `port` is outside
/// 0..=65535, or if resolution fails. When `status` is non-null the outcome
/// is written there: `Ok`, `NullArg`, `InvalidUtf8`, `InvalidPort`,
/// `Resolve` or `Panic`.
/// The caller must free the returned pointer with `rest_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_new(
    host: *const c_char,
    port: i32,
    status: *mut FfiErrorCode,
) -> *mut FfiRestClient {
    let result = catch_unwind(|| {
        let host = borrow_str(host)?;
        let port = u16::try_from(port).map_err(|_| {
            tracing::debug!(port, "port out of range");
            FfiErrorCode::InvalidPort
        })?;
        RestClient::new(host, port).map_err(|err| {
            tracing::debug!(error = %err, "client construction failed");
            FfiErrorCode::from(&err)
        })
    })
    .unwrap_or(Err(FfiErrorCode::Panic));

    match result {
        Ok(client) => {
            report(status, FfiErrorCode::Ok);
            Box::into_raw(Box::new(FfiRestClient::new(client)))
        }
        Err(code) => {
            report(status, code);
            std::ptr::null_mut()
        }
    }
}

/// Free a client created by `rest_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_free(client: *mut FfiRestClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a request with a numeric method (1 DELETE, 2 GET, 3 POST, 4 PUT).
///
/// `body` may be null for GET and DELETE. Method 0 yields
/// `UnsupportedMethod`; any other unknown value yields `MethodOutOfRange`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_send(
    client: *const FfiRestClient,
    method: i32,
    resource: *const c_char,
    body: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| dispatch(client, method, resource, body, BodyArg::Optional))
        .unwrap_or(FfiErrorCode::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn rest_client_get(
    client: *const FfiRestClient,
    resource: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        let method = FfiHttpMethod::Get as i32;
        dispatch(client, method, resource, std::ptr::null(), BodyArg::Optional)
    })
    .unwrap_or(FfiErrorCode::Panic)
}

#[unsafe(no_mangle)]
pub extern "C" fn rest_client_delete(
    client: *const FfiRestClient,
    resource: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        let method = FfiHttpMethod::Delete as i32;
        dispatch(client, method, resource, std::ptr::null(), BodyArg::Optional)
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Send a POST with a pre-serialized JSON `body`. A null body is `NullArg`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_post(
    client: *const FfiRestClient,
    resource: *const c_char,
    body: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        let method = FfiHttpMethod::Post as i32;
        dispatch(client, method, resource, body, BodyArg::Required)
    })
    .unwrap_or(FfiErrorCode::Panic)
}

/// Send a PUT with a pre-serialized JSON `body`. A null body is `NullArg`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_put(
    client: *const FfiRestClient,
    resource: *const c_char,
    body: *const c_char,
) -> FfiErrorCode {
    catch_unwind(|| {
        let method = FfiHttpMethod::Put as i32;
        dispatch(client, method, resource, body, BodyArg::Required)
    })
    .unwrap_or(FfiErrorCode::Panic)
}

// ---------------------------------------------------------------------------
// Errors and strings
// ---------------------------------------------------------------------------

/// Copy of the message for the last failed request on `client`, or null if
/// the last request succeeded. Free it with `rest_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn rest_client_last_error_message(client: *const FfiRestClient) -> *mut c_char {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        match client.last_error.lock() {
            Ok(slot) => slot
                .as_ref()
                .map(|msg| msg.clone().into_raw())
                .unwrap_or(std::ptr::null_mut()),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn rest_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
