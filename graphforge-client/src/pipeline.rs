//! Scoped session lifecycle
//!
//! Every execution path acquires a session, uses it and releases it
//! exactly once. [`SessionGuard`] owns the handle for the duration of the
//! scope: the normal paths close it explicitly and await the release; if
//! the executing future is dropped mid-flight, the guard's `Drop` hands
//! the release to the ambient runtime instead.

use crate::error::Result;
use crate::runner::SessionHandle;

pub(crate) struct SessionGuard {
    handle: Option<Box<dyn SessionHandle>>,
}

impl SessionGuard {
    pub(crate) fn new(handle: Box<dyn SessionHandle>) -> Self {
        Self {
            handle: Some(handle),
        }
    }

    /// Access the live handle. Must not be called after [`close`].
    ///
    /// [`close`]: SessionGuard::close
    pub(crate) fn handle_mut(&mut self) -> &mut dyn SessionHandle {
        self.handle
            .as_mut()
            .map(|h| h.as_mut())
            .unwrap_or_else(|| unreachable!("session handle used after close"))
    }

    /// Release the session, awaiting the provider's cleanup. Idempotent.
    pub(crate) async fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.close().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        // The owning future was cancelled before it could close the
        // session; release on the runtime so the provider still gets
        // its handle back.
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(error) = handle.close().await {
                        log::warn!("failed to release abandoned session: {}", error);
                    }
                });
            }
            Err(_) => {
                log::warn!("session guard dropped outside a runtime; session not released");
            }
        }
    }
}
