//! Concrete Future type for token builds.
//!
//! A build runs to completion on tokio's blocking pool and its result comes
//! back through a oneshot channel. Dropping the future does not cancel the
//! build.

use crate::error::{JwtBuildError, JwtResult};
use crate::types::CompactToken;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Future for a token build.
pub struct TokenBuildFuture {
    rx: oneshot::Receiver<JwtResult<CompactToken>>,
}

impl TokenBuildFuture {
    /// Create a new token build future with the given receiver.
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<CompactToken>>) -> Self {
        Self { rx }
    }

    /// Run `build` off the async executor.
    ///
    /// Outside a tokio runtime the build runs inline and the future is
    /// already complete.
    pub(crate) fn spawn<F>(build: F) -> Self
    where
        F: FnOnce() -> JwtResult<CompactToken> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    let _ = tx.send(build());
                });
            }
            Err(_) => {
                let _ = tx.send(build());
            }
        }
        Self::new(rx)
    }
}

impl Future for TokenBuildFuture {
    type Output = JwtResult<CompactToken>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtBuildError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
