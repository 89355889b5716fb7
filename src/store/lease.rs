//! Scoped acquisition and release of store handles

use super::traits::{Backend, StoreHandle};
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// A store handle held for the duration of one search
///
/// Call [`Lease::release`] to close the handle. A lease dropped without
/// release (the request was cancelled) schedules the close on the current
/// runtime instead.
pub struct Lease {
    handle: Arc<dyn StoreHandle>,
    released: bool,
}

impl Lease {
    /// Acquire a handle from the backend
    pub async fn acquire(backend: &dyn Backend) -> Result<Self> {
        let handle = backend.acquire().await?;
        debug!("Acquired {} store handle", backend.name());
        Ok(Self {
            handle,
            released: false,
        })
    }

    /// The leased handle
    pub fn handle(&self) -> Arc<dyn StoreHandle> {
        self.handle.clone()
    }

    /// Close the handle and end the lease
    pub async fn release(mut self) {
        self.handle.close().await;
        self.released = true;
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                debug!("Lease dropped before release, closing in background");
                let handle = self.handle.clone();
                runtime.spawn(async move { handle.close().await });
            }
            Err(_) => debug!("Lease dropped outside a runtime, handle dropped without close"),
        }
    }
}

/// Run `f` with a freshly acquired store handle, releasing it afterwards
///
/// Acquisition failures are returned before `f` runs. The handle is released
/// whether `f` succeeds or fails.
pub async fn with_store_handle<F, Fut, T>(backend: &dyn Backend, f: F) -> Result<T>
where
    F: FnOnce(Arc<dyn StoreHandle>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let lease = Lease::acquire(backend).await?;
    let outcome = f(lease.handle()).await;
    lease.release().await;
    outcome
}
