//! Result envelope returned by every bridge-level operation

use crate::{BridgeError, BridgeResult};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Closed two-variant result protocol for the bridge boundary
///
/// Every bridge operation returns exactly one envelope. No fault is allowed
/// to propagate across the boundary as a panic; [`Envelope::catch`] converts
/// anything uncaught into a `Fail` with a runtime-fault code.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
    /// Operation succeeded with a payload
    Ok(T),
    /// Operation failed; `message` is never empty
    Fail {
        code: u32,
        message: String,
        trace: Option<String>,
    },
}

impl<T> Envelope<T> {
    /// Create a failure envelope from an error
    pub fn fail(err: BridgeError) -> Self {
        let code = err.error_code();
        let trace = err.trace().map(str::to_owned);
        let mut message = err.message().to_owned();
        if message.trim().is_empty() {
            // never let an empty message reach a caller
            message = err.to_string();
        }
        if message.trim().is_empty() {
            message = "Operation failed".to_owned();
        }
        Envelope::Fail {
            code,
            message,
            trace,
        }
    }

    /// True if this envelope carries a payload
    pub fn is_ok(&self) -> bool {
        matches!(self, Envelope::Ok(_))
    }

    /// Convert into a standard result, reconstructing the typed error
    pub fn into_result(self) -> BridgeResult<T> {
        match self {
            Envelope::Ok(v) => Ok(v),
            Envelope::Fail {
                code,
                message,
                trace,
            } => Err(BridgeError::from_code(code, message, trace)),
        }
    }

    /// Run `op` at the bridge boundary, converting panics to failures
    ///
    /// The catch-all that keeps the taxonomy closed: a panic inside a bridge
    /// operation becomes a `RuntimeFault` envelope instead of unwinding into
    /// the worker loop.
    pub fn catch(op: impl FnOnce() -> BridgeResult<T>) -> Self {
        match catch_unwind(AssertUnwindSafe(op)) {
            Ok(Ok(v)) => Envelope::Ok(v),
            Ok(Err(e)) => Envelope::fail(e),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("bridge operation panicked: {message}");
                Envelope::fail(BridgeError::runtime(message))
            }
        }
    }
}

impl<T> From<BridgeResult<T>> for Envelope<T> {
    fn from(res: BridgeResult<T>) -> Self {
        match res {
            Ok(v) => Envelope::Ok(v),
            Err(e) => Envelope::fail(e),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_owned()
    }
}
