//!
//! Offloading of CPU-bound cryptography from the async runtime
//!

use tokio::sync::oneshot;
use tracing::{debug, Span};

/// Spawn cryptography-related work (token encryption, signature creation/verification) onto the
/// rayon pool and await its output
#[inline]
pub async fn crypto<F, O>(func: F) -> Result<O, oneshot::error::RecvError>
where
    F: FnOnce() -> O + Send + 'static,
    O: Send + 'static,
{
    let (sender, receiver) = oneshot::channel();
    let span = Span::current();

    rayon::spawn(move || {
        let _entered = span.enter();
        let out = func();

        if sender.send(out).is_err() {
            debug!("Failed to send back value from rayon threadpool");
        }
    });

    receiver.await
}

#[cfg(test)]
mod test {
    #[tokio::test]
    async fn returns_output() {
        let output = super::crypto(|| 21 * 2).await.unwrap();
        assert_eq!(output, 42);
    }
}
