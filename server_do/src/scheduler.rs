use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Drives the match at a fixed interval via the actor's alarm.
///
/// `start` only works from `Idle`; `stop` is terminal and idempotent, so a
/// finished match can never be ticked again.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    state: SchedulerState,
    interval_ms: u64,
    snapshot_stride: u32,
    ticks: u64,
}

impl TickScheduler {
    pub fn new(interval_ms: u64, snapshot_stride: u32) -> Self {
        Self {
            state: SchedulerState::Idle,
            interval_ms: interval_ms.max(1),
            snapshot_stride: snapshot_stride.max(1),
            ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns true if this call started the scheduler
    pub fn start(&mut self) -> bool {
        if self.state != SchedulerState::Idle {
            return false;
        }
        self.state = SchedulerState::Running;
        true
    }

    /// Returns true if this call stopped a running (or idle) scheduler
    pub fn stop(&mut self) -> bool {
        if self.state == SchedulerState::Stopped {
            return false;
        }
        self.state = SchedulerState::Stopped;
        true
    }

    /// Count a tick. Returns whether a snapshot is due on it.
    pub fn advance(&mut self) -> bool {
        self.ticks += 1;
        self.ticks % self.snapshot_stride as u64 == 0
    }
}
