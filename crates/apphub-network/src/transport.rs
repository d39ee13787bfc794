//! The transport seam.

use crate::{HttpRequest, HttpResponse};

/// Performs HTTP exchanges on behalf of the identity layer.
///
/// Implementations run on a single-threaded event loop, so the returned
/// future is not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send `request` and wait for it to complete.
    ///
    /// Transport-level failures are reported inside the returned
    /// [`HttpResponse`], never by panicking.
    async fn send(&self, request: HttpRequest) -> HttpResponse;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, request: HttpRequest) -> HttpResponse {
        (**self).send(request).await
    }
}
