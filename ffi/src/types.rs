//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! The client handle is opaque to C. Every request function returns an
//! `FfiErrorCode`; the matching human-readable message is kept on the handle
//! and fetched with `rest_client_last_error_message`, so no error strings
//! need freeing on the hot path.

use std::ffi::CString;
use std::sync::Mutex;

use restclient_core::{ClientError, RestClient};

/// Opaque handle to a `RestClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiRestClient {
    pub(crate) inner: RestClient,
    pub(crate) last_error: Mutex<Option<CString>>,
}

impl FfiRestClient {
    pub(crate) fn new(inner: RestClient) -> Self {
        Self {
            inner,
            last_error: Mutex::new(None),
        }
    }

    /// Remember `message` as the last failure, replacing any previous one.
    pub(crate) fn set_last_error(&self, message: &str) {
        let message = CString::new(message.replace('\0', " ")).ok();
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = message;
        }
    }

    pub(crate) fn clear_last_error(&self) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = None;
        }
    }
}

/// HTTP method numbering shared with C callers. `None` is accepted on the
/// wire only so that it can be rejected with `UnsupportedMethod`.
#[repr(C)]
pub enum FfiHttpMethod {
    None = 0,
    Delete = 1,
    Get = 2,
    Post = 3,
    Put = 4,
}

/// Status codes returned by every request function, and through the
/// `status` out-parameter of `rest_client_new`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    NullArg = 1,
    InvalidUtf8 = 2,
    UnsupportedMethod = 3,
    MethodOutOfRange = 4,
    MissingBody = 5,
    Connect = 6,
    Send = 7,
    Resolve = 8,
    Panic = 9,
    InvalidPort = 10,
}

impl From<&ClientError> for FfiErrorCode {
    fn from(err: &ClientError) -> Self {
        match err {
            ClientError::InvalidHost(_)
            | ClientError::Dns { .. }
            | ClientError::NoAddresses(_)
            | ClientError::Unreachable { .. } => FfiErrorCode::Resolve,
            ClientError::UnsupportedMethod => FfiErrorCode::UnsupportedMethod,
            ClientError::MethodOutOfRange(_) => FfiErrorCode::MethodOutOfRange,
            ClientError::MissingBody(_) => FfiErrorCode::MissingBody,
            ClientError::Connect { .. } => FfiErrorCode::Connect,
            ClientError::Send { .. } => FfiErrorCode::Send,
        }
    }
}
