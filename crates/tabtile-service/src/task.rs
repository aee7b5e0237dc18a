//! Detached request helper

use std::future::Future;

use tokio::task::JoinHandle;

/// Run `fut` on the current tokio runtime without awaiting it.
///
/// A failure is logged here and then dropped; the caller never sees it. The
/// returned handle may be ignored. Must be called from within a runtime.
pub fn fire_and_forget<F, T, E>(what: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = std::result::Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            tracing::error!(request = what, error = %e, "Background request failed");
        }
    })
}
