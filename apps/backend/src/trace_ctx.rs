//! Task-local trace id for the request being served.
//!
//! `RequestTrace` opens the scope; error responses read it back so the
//! Problem Details body and the `x-trace-id` header carry the same id as the
//! request log line. Orchestration code never reads it.

use std::cell::RefCell;

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: RefCell<Option<String>>;
}

/// Trace id of the current task, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Runs `future` with `trace_id` installed.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(RefCell::new(Some(trace_id)), future).await
}
