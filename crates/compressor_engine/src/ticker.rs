use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::upload::EventSink;
use crate::{EngineEvent, SessionId};

/// Spawns the cosmetic progress timer of one session.
///
/// Emits [`EngineEvent::ProgressTick`] every `interval` until the returned
/// token is cancelled. The first tick is one full interval after the start.
pub fn spawn_progress_ticker(
    handle: &Handle,
    session_id: SessionId,
    interval: Duration,
    sink: Arc<dyn EventSink>,
) -> CancellationToken {
    let token = CancellationToken::new();
    let cancelled = token.clone();
    handle.spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => sink.emit(EngineEvent::ProgressTick { session_id }),
            }
        }
    });
    token
}
