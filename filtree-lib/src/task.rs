//! Detached task spawning.

use std::future::Future;

use tokio::runtime::Handle;

/// Spawn a future on the current tokio runtime without awaiting it.
///
/// Returns `false` and drops the future when no runtime is running.
pub(crate) fn spawn_detached<F>(future: F) -> bool
where
    F: Future<Output = ()> + Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
            true
        }
        Err(_) => {
            log::debug!("No async runtime running, dropping detached task");
            false
        }
    }
}
