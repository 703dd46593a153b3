//! Frame pacing and timing statistics.
//!
//! Every frame walks the same sequence of phases:
//!
//! ```text
//! Idle -> FrameStarted -> BuffersCleared -> GeometryMutated
//!      -> PixelsPrepared -> BufferFlushed -> Synced -> Idle
//! ```
//!
//! [`FrameScheduler`] enforces that order and, on the `Synced` step, blocks
//! until the target frame duration has elapsed since `FrameStarted`. A frame
//! that already overran its budget is not waited on; it only shows up in the
//! [`FrameStats`].

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::trace;
use serde::Deserialize;
use thiserror::Error;

/// Weight floor for the running averages. Below 1/50 the average switches
/// from a cumulative mean to an exponential one.
const MIN_AVERAGE_WEIGHT: f64 = 0.02;

// =============================================================================
// Phases
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    FrameStarted,
    BuffersCleared,
    GeometryMutated,
    PixelsPrepared,
    BufferFlushed,
    Synced,
}

impl FramePhase {
    /// The only phase this one may move to.
    pub fn next(self) -> FramePhase {
        match self {
            FramePhase::Idle => FramePhase::FrameStarted,
            FramePhase::FrameStarted => FramePhase::BuffersCleared,
            FramePhase::BuffersCleared => FramePhase::GeometryMutated,
            FramePhase::GeometryMutated => FramePhase::PixelsPrepared,
            FramePhase::PixelsPrepared => FramePhase::BufferFlushed,
            FramePhase::BufferFlushed => FramePhase::Synced,
            FramePhase::Synced => FramePhase::Idle,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("frame phase {from:?} cannot move to {to:?} (expected {expected:?})")]
    OutOfOrder {
        from: FramePhase,
        to: FramePhase,
        expected: FramePhase,
    },
}

// =============================================================================
// Pacing
// =============================================================================

/// How the `Synced` step waits out the rest of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacingPolicy {
    /// Busy-wait. Tight timing at full CPU.
    #[default]
    Spin,
    /// Thread sleep. Cheap, but overshoots by the OS timer slack.
    Sleep,
}

impl fmt::Display for PacingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacingPolicy::Spin => write!(f, "spin"),
            PacingPolicy::Sleep => write!(f, "sleep"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pacing policy '{0}' (expected 'spin' or 'sleep')")]
pub struct UnknownPacingPolicy(pub String);

impl FromStr for PacingPolicy {
    type Err = UnknownPacingPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spin" | "loop" => Ok(PacingPolicy::Spin),
            "sleep" => Ok(PacingPolicy::Sleep),
            _ => Err(UnknownPacingPolicy(s.to_string())),
        }
    }
}

impl PacingPolicy {
    /// Blocks until `deadline`. Returns immediately if it has passed.
    pub fn wait_until(self, deadline: Instant) {
        match self {
            PacingPolicy::Spin => {
                while Instant::now() < deadline {
                    std::hint::spin_loop();
                }
            }
            PacingPolicy::Sleep => {
                if let Some(remaining) = deadline.checked_duration_since(Instant::now()) {
                    std::thread::sleep(remaining);
                }
            }
        }
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Timing of the most recent frame plus running averages.
///
/// All times are in milliseconds. Any quantity whose denominator is zero is
/// reported as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Frames recorded so far.
    pub frames: u64,
    /// Target frame duration.
    pub target_ms: f64,
    /// Start of frame to buffer flush.
    pub compute_ms: f64,
    /// Start of frame to end of the pacing wait.
    pub frame_ms: f64,
    /// Share of the frame budget spent computing, in percent.
    pub utilization: f64,
    /// Frame rate if frames took only their compute time.
    pub theoretical_fps: f64,
    /// Frame rate actually achieved.
    pub measured_fps: f64,
    pub avg_compute_ms: f64,
    pub avg_utilization: f64,
    pub avg_fps: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

impl FrameStats {
    /// Folds one frame into the statistics.
    pub fn record(&mut self, compute: Duration, end_to_end: Duration, target: Duration) {
        self.frames += 1;
        self.target_ms = millis(target);
        self.compute_ms = millis(compute);
        self.frame_ms = millis(end_to_end);

        self.utilization = 100.0 * ratio(self.compute_ms, self.target_ms);
        self.theoretical_fps = ratio(1000.0, self.compute_ms);
        self.measured_fps = ratio(1000.0, self.frame_ms);

        let alpha = (1.0 / self.frames as f64).max(MIN_AVERAGE_WEIGHT);
        self.avg_compute_ms = (1.0 - alpha) * self.avg_compute_ms + alpha * self.compute_ms;
        self.avg_utilization = 100.0 * ratio(self.avg_compute_ms, self.target_ms);
        self.avg_fps = ratio(1000.0, self.avg_compute_ms);
    }
}

// =============================================================================
// Scheduler
// =============================================================================

pub struct FrameScheduler {
    target: Duration,
    policy: PacingPolicy,
    sync_adjust: Duration,
    phase: FramePhase,
    frame_start: Instant,
    compute: Duration,
    stats: FrameStats,
    late: u64,
}

impl FrameScheduler {
    /// Creates a scheduler pacing to `fps` frames per second. A rate of zero
    /// disables pacing.
    pub fn new(fps: u32, policy: PacingPolicy, sync_adjust: Duration) -> Self {
        let target = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(fps))
        };
        Self {
            target,
            policy,
            sync_adjust,
            phase: FramePhase::Idle,
            frame_start: Instant::now(),
            compute: Duration::ZERO,
            stats: FrameStats::default(),
            late: 0,
        }
    }

    pub fn target_frame_time(&self) -> Duration {
        self.target
    }

    pub fn policy(&self) -> PacingPolicy {
        self.policy
    }

    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Statistics as of the last completed frame.
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Frames abandoned through [`FrameScheduler::abort_frame`].
    pub fn late_frames(&self) -> u64 {
        self.late
    }

    /// Abandons the frame in progress and returns to `Idle`. The frame counts
    /// as late and its timing is left out of the statistics. Does nothing
    /// when no frame is in progress.
    pub fn abort_frame(&mut self) {
        if self.phase != FramePhase::Idle {
            self.late += 1;
            self.phase = FramePhase::Idle;
        }
    }

    /// Moves to `to` if it directly follows the current phase.
    pub fn advance(&mut self, to: FramePhase) -> Result<(), SchedulerError> {
        let expected = self.phase.next();
        if to != expected {
            return Err(SchedulerError::OutOfOrder {
                from: self.phase,
                to,
                expected,
            });
        }
        self.phase = to;
        Ok(())
    }

    /// `Idle -> FrameStarted`: starts the frame clock.
    pub fn start_frame(&mut self) -> Result<(), SchedulerError> {
        self.advance(FramePhase::FrameStarted)?;
        self.frame_start = Instant::now();
        Ok(())
    }

    /// `PixelsPrepared -> BufferFlushed`: stops the compute clock.
    pub fn buffer_flushed(&mut self) -> Result<(), SchedulerError> {
        self.advance(FramePhase::BufferFlushed)?;
        self.compute = self.frame_start.elapsed();
        Ok(())
    }

    /// `BufferFlushed -> Synced -> Idle`: waits out the frame budget and
    /// records the frame's statistics.
    pub fn sync(&mut self) -> Result<&FrameStats, SchedulerError> {
        self.advance(FramePhase::Synced)?;

        if !self.target.is_zero() {
            let deadline = self.frame_start + self.target + self.sync_adjust;
            self.policy.wait_until(deadline);
        }

        let end_to_end = self.frame_start.elapsed();
        self.stats.record(self.compute, end_to_end, self.target);
        trace!(
            "frame {}: compute {:.3}ms, total {:.3}ms, util {:.1}%",
            self.stats.frames,
            self.stats.compute_ms,
            self.stats.frame_ms,
            self.stats.utilization
        );

        self.advance(FramePhase::Idle)?;
        Ok(&self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run_frame(scheduler: &mut FrameScheduler) -> Result<FrameStats, SchedulerError> {
        scheduler.start_frame()?;
        scheduler.advance(FramePhase::BuffersCleared)?;
        scheduler.advance(FramePhase::GeometryMutated)?;
        scheduler.advance(FramePhase::PixelsPrepared)?;
        scheduler.buffer_flushed()?;
        scheduler.sync().copied()
    }

    #[test]
    fn phases_cycle_back_to_idle() {
        let mut phase = FramePhase::Idle;
        for _ in 0..7 {
            phase = phase.next();
        }
        assert_eq!(phase, FramePhase::Idle);
    }

    #[test]
    fn full_frame_returns_to_idle() {
        let mut scheduler = FrameScheduler::new(0, PacingPolicy::Spin, Duration::ZERO);
        let stats = run_frame(&mut scheduler).unwrap();
        assert_eq!(scheduler.phase(), FramePhase::Idle);
        assert_eq!(stats.frames, 1);
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut scheduler = FrameScheduler::new(60, PacingPolicy::Spin, Duration::ZERO);
        scheduler.start_frame().unwrap();
        let err = scheduler.advance(FramePhase::PixelsPrepared).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::OutOfOrder {
                from: FramePhase::FrameStarted,
                to: FramePhase::PixelsPrepared,
                expected: FramePhase::BuffersCleared,
            }
        );
        // A rejected transition leaves the phase alone.
        assert_eq!(scheduler.phase(), FramePhase::FrameStarted);
    }

    #[test]
    fn sync_before_flush_is_rejected() {
        let mut scheduler = FrameScheduler::new(60, PacingPolicy::Spin, Duration::ZERO);
        assert!(scheduler.sync().is_err());
    }

    #[test]
    fn aborted_frame_returns_to_idle() {
        let mut scheduler = FrameScheduler::new(0, PacingPolicy::Spin, Duration::ZERO);
        scheduler.start_frame().unwrap();
        scheduler.advance(FramePhase::BuffersCleared).unwrap();
        scheduler.abort_frame();
        assert_eq!(scheduler.phase(), FramePhase::Idle);
        assert_eq!(scheduler.late_frames(), 1);
        assert_eq!(scheduler.stats().frames, 0);

        // Idle already: nothing to abandon.
        scheduler.abort_frame();
        assert_eq!(scheduler.late_frames(), 1);

        let stats = run_frame(&mut scheduler).unwrap();
        assert_eq!(stats.frames, 1);
    }

    #[test]
    fn sync_waits_for_target() {
        for policy in [PacingPolicy::Spin, PacingPolicy::Sleep] {
            let mut scheduler = FrameScheduler::new(200, policy, Duration::ZERO);
            let stats = run_frame(&mut scheduler).unwrap();
            assert!(stats.frame_ms >= 5.0, "{policy}: {}", stats.frame_ms);
            assert!(stats.compute_ms <= stats.frame_ms);
        }
    }

    #[test]
    fn stats_derive_rates() {
        let mut stats = FrameStats::default();
        stats.record(
            Duration::from_millis(4),
            Duration::from_millis(10),
            Duration::from_millis(20),
        );
        assert_relative_eq!(stats.compute_ms, 4.0, epsilon = 1e-9);
        assert_relative_eq!(stats.utilization, 20.0, epsilon = 1e-9);
        assert_relative_eq!(stats.theoretical_fps, 250.0, epsilon = 1e-9);
        assert_relative_eq!(stats.measured_fps, 100.0, epsilon = 1e-9);
        assert_relative_eq!(stats.avg_compute_ms, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_durations_report_zero() {
        let mut stats = FrameStats::default();
        stats.record(Duration::ZERO, Duration::ZERO, Duration::ZERO);
        assert_eq!(stats.utilization, 0.0);
        assert_eq!(stats.theoretical_fps, 0.0);
        assert_eq!(stats.measured_fps, 0.0);
        assert_eq!(stats.avg_fps, 0.0);
    }

    #[test]
    fn average_is_cumulative_mean_early_on() {
        let mut stats = FrameStats::default();
        let target = Duration::from_millis(16);
        for ms in [2, 4, 6] {
            stats.record(Duration::from_millis(ms), target, target);
        }
        assert_relative_eq!(stats.avg_compute_ms, 4.0, epsilon = 1e-9);
    }

    #[test]
    fn average_weight_has_a_floor() {
        let mut stats = FrameStats::default();
        let target = Duration::from_millis(16);
        for _ in 0..200 {
            stats.record(Duration::from_millis(10), target, target);
        }
        stats.record(Duration::from_millis(60), target, target);
        // 0.98 * 10 + 0.02 * 60
        assert_relative_eq!(stats.avg_compute_ms, 11.0, epsilon = 1e-6);
    }

    #[test]
    fn pacing_policy_parses() {
        assert_eq!("Sleep".parse::<PacingPolicy>(), Ok(PacingPolicy::Sleep));
        assert_eq!("loop".parse::<PacingPolicy>(), Ok(PacingPolicy::Spin));
        assert!("busy".parse::<PacingPolicy>().is_err());
    }
}
