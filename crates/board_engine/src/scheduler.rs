use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use board_core::CycleSeq;
use board_logging::{board_debug, board_info};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::cycle::CyclePipeline;
use crate::EngineEvent;

/// Drives poll cycles on a fixed interval.
///
/// Ticks do not wait for the previous cycle, so cycles may overlap. Each one
/// carries a fresh [`CycleSeq`] and the consumer decides what to do with
/// results that arrive out of order.
pub struct PollScheduler {
    runtime: Handle,
    pipeline: Arc<CyclePipeline>,
    interval: Duration,
    next_seq: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<EngineEvent>,
    timer: Option<CancellationToken>,
    cycles: CancellationToken,
}

impl PollScheduler {
    pub fn new(
        runtime: Handle,
        pipeline: CyclePipeline,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (events, event_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            pipeline: Arc::new(pipeline),
            // tokio intervals panic on zero periods.
            interval: interval.max(Duration::from_millis(1)),
            next_seq: Arc::new(AtomicU64::new(CycleSeq::FIRST.0)),
            events,
            timer: None,
            cycles: CancellationToken::new(),
        };
        (scheduler, event_rx)
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Runs one cycle now and arms the repeating timer. Returns `false` if
    /// already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let timer = CancellationToken::new();
        let ctx = self.spawner();
        let interval = self.interval;
        let stopped = timer.clone();

        self.runtime.spawn(async move {
            let mut ticks = tokio::time::interval(interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = stopped.cancelled() => break,
                    // The first tick completes immediately.
                    _ = ticks.tick() => {
                        ctx.spawn_cycle();
                    }
                }
            }
            board_debug!("poll timer stopped");
        });

        board_info!("polling every {:?}", interval);
        self.timer = Some(timer);
        true
    }

    /// Cancels the timer. Cycles already in flight still finish and report.
    pub fn stop(&mut self) -> bool {
        match self.timer.take() {
            Some(timer) => {
                timer.cancel();
                board_info!("polling stopped");
                true
            }
            None => false,
        }
    }

    /// Stops the timer and cancels in-flight cycles before their next batch.
    /// Cycles started afterwards get a fresh token.
    pub fn shutdown(&mut self) {
        self.stop();
        let cancelled = std::mem::replace(&mut self.cycles, CancellationToken::new());
        cancelled.cancel();
    }

    /// Runs one cycle outside the timer.
    pub fn trigger(&self) -> CycleSeq {
        self.spawner().spawn_cycle()
    }

    fn spawner(&self) -> CycleSpawner {
        CycleSpawner {
            runtime: self.runtime.clone(),
            pipeline: self.pipeline.clone(),
            next_seq: self.next_seq.clone(),
            events: self.events.clone(),
            cycles: self.cycles.clone(),
        }
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct CycleSpawner {
    runtime: Handle,
    pipeline: Arc<CyclePipeline>,
    next_seq: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<EngineEvent>,
    cycles: CancellationToken,
}

impl CycleSpawner {
    fn spawn_cycle(&self) -> CycleSeq {
        let seq = CycleSeq(self.next_seq.fetch_add(1, Ordering::Relaxed));
        let pipeline = self.pipeline.clone();
        let events = self.events.clone();
        let cancel = self.cycles.clone();

        let _ = events.send(EngineEvent::CycleStarted { seq });
        self.runtime.spawn(async move {
            let report = pipeline.run(seq, &cancel).await;
            // The receiver may be gone during shutdown.
            let _ = events.send(EngineEvent::CycleFinished(report));
        });
        seq
    }
}
