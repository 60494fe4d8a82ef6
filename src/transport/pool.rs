//! Bounded-concurrency batch executor
//!
//! Every request carries its index into the batch. Completions arrive in
//! whatever order the network produces; each one lands in its own slot and the
//! slots are linearized by index once the batch is complete.

use crate::transport::{Request, Transport};
use crate::{Result, StreamError};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use tokio::sync::Semaphore;

/// Requests in flight per batch unless configured otherwise
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Sends `requests` through `transport`, at most `concurrency` at a time
///
/// # Arguments
///
/// * `transport` - The transport to send through
/// * `requests` - The batch, in output order
/// * `concurrency` - Maximum requests in flight (0 is treated as 1)
///
/// # Returns
///
/// * `Ok(Vec<Value>)` - One document per request, in request order
/// * `Err(StreamError::Batch)` - The first request that failed; the rest of the
///   batch is abandoned
pub async fn dispatch<T>(
    transport: &T,
    requests: Vec<Request>,
    concurrency: usize,
) -> Result<Vec<Value>>
where
    T: Transport + ?Sized,
{
    let total = requests.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    let limit = Semaphore::new(concurrency.max(1));
    tracing::trace!(
        "Dispatching batch of {} requests, concurrency {}",
        total,
        concurrency.max(1)
    );

    let mut in_flight: FuturesUnordered<_> = requests
        .iter()
        .enumerate()
        .map(|(index, request)| {
            let limit = &limit;
            async move {
                // The semaphore is local and never closed
                let _permit = limit.acquire().await.ok();
                (index, transport.send(request).await)
            }
        })
        .collect();

    let mut slots: Vec<Option<Value>> = vec![None; total];

    while let Some((index, outcome)) = in_flight.next().await {
        match outcome {
            Ok(document) => slots[index] = Some(document),
            Err(source) => {
                tracing::debug!(
                    "Batch request {} of {} failed, abandoning batch: {}",
                    index,
                    total,
                    source
                );
                return Err(StreamError::Batch {
                    index,
                    total,
                    uri: requests[index].uri.clone(),
                    source: Box::new(source),
                });
            }
        }
    }

    // Every future yields exactly once, so every slot is filled here
    Ok(slots.into_iter().flatten().collect())
}
