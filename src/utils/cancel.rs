// src/utils/cancel.rs

//! Cancellation of in-flight requests when a view is torn down.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

/// Run `fut` unless `token` is (or becomes) cancelled first.
///
/// A token that is already cancelled short-circuits without polling `fut`.
pub async fn cancellable<F, T>(token: &CancellationToken, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    if token.is_cancelled() {
        return Err(AppError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = token.cancelled() => Err(AppError::Cancelled),
        result = fut => result,
    }
}
