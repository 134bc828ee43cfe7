use std::future::Future;

use futures::stream::{self, StreamExt};
use patterns_core::Result;
use tracing::warn;

/// Drives `branches` with at most `max_concurrent` in flight and returns their
/// outputs in input order.
///
/// The first failing branch ends the fan-out: its error is returned and the
/// remaining branches, running or not yet started, are dropped.
pub async fn fan_out<T, F>(branches: Vec<F>, max_concurrent: usize) -> Result<Vec<T>>
where
    F: Future<Output = Result<T>>,
{
    let width = branches.len();
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(width).collect();

    let mut pending = stream::iter(
        branches
            .into_iter()
            .enumerate()
            .map(|(index, branch)| async move { (index, branch.await) }),
    )
    .buffer_unordered(max_concurrent.max(1));

    while let Some((index, outcome)) = pending.next().await {
        match outcome {
            Ok(value) => slots[index] = Some(value),
            Err(e) => {
                warn!("FANOUT: Branch {}/{} failed, cancelling the rest: {}", index + 1, width, e);
                return Err(e);
            }
        }
    }

    // Every branch completed successfully, so every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}
