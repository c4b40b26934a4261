//! Frame timing.
//!
//! [`Clock`] is driven with explicit millisecond timestamps so the session
//! loop stays deterministic under test. It tracks run/pause, frame count,
//! FPS, and the fixed-interval ambient ticker that keeps running while the
//! simulation is paused.
//!
//! # Example
//!
//! ```ignore
//! use thoughtspace::time::{unix_millis, Clock};
//!
//! let mut clock = Clock::new(33);
//!
//! // In your frame callback:
//! let frame = clock.advance(unix_millis());
//! if frame.step_physics {
//!     // physics step
//! }
//! for _ in 0..frame.ambient_ticks {
//!     // ambient effects tick
//! }
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

/// Longest frame gap the ambient ticker will catch up on.
const MAX_CATCH_UP_TICKS: u32 = 4;
/// How often FPS is recomputed.
const FPS_UPDATE_MS: u64 = 500;

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Fixed-period ticker fed by variable frame deltas.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period_ms: u64,
    accumulated_ms: u64,
}

impl Interval {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated_ms: 0,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Add elapsed time and return how many whole periods fired.
    pub fn advance(&mut self, delta_ms: u64) -> u32 {
        self.accumulated_ms += delta_ms;
        let ticks = self.accumulated_ms / self.period_ms;
        self.accumulated_ms %= self.period_ms;
        if ticks > MAX_CATCH_UP_TICKS as u64 {
            // long stall: drop the backlog instead of bursting
            self.accumulated_ms = 0;
            return MAX_CATCH_UP_TICKS;
        }
        ticks as u32
    }
}

/// What one frame should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub now_ms: u64,
    pub delta_ms: u64,
    pub step_physics: bool,
    pub ambient_ticks: u32,
}

/// Run/pause state plus frame and ambient timing.
#[derive(Debug, Clone)]
pub struct Clock {
    running: bool,
    last_ms: Option<u64>,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_ms: u64,
    ambient: Interval,
}

impl Clock {
    /// A running clock with the given ambient period.
    pub fn new(ambient_interval_ms: u64) -> Self {
        Self {
            running: true,
            last_ms: None,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_ms: 0,
            ambient: Interval::new(ambient_interval_ms),
        }
    }

    /// Start a frame at `now_ms`. Physics steps once per frame while running;
    /// ambient ticks fire regardless.
    pub fn advance(&mut self, now_ms: u64) -> Frame {
        let delta_ms = match self.last_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => {
                self.fps_update_ms = now_ms;
                self.fps_frame_count = self.frame_count + 1;
                0
            }
        };
        self.last_ms = Some(now_ms);
        self.frame_count += 1;

        let since_fps = now_ms.saturating_sub(self.fps_update_ms);
        if since_fps >= FPS_UPDATE_MS {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 * 1000.0 / since_fps as f32;
            self.fps_frame_count = self.frame_count;
            self.fps_update_ms = now_ms;
        }

        Frame {
            now_ms,
            delta_ms,
            step_physics: self.running,
            ambient_ticks: self.ambient.advance(delta_ms),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        !self.running
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Flip run/pause. Returns whether the clock is now running.
    pub fn toggle_pause(&mut self) -> bool {
        self.running = !self.running;
        tracing::debug!(running = self.running, "run state toggled");
        self.running
    }

    pub fn set_ambient_interval(&mut self, period_ms: u64) {
        self.ambient = Interval::new(period_ms);
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(33)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = Clock::new(33);
        assert_eq!(clock.frame(), 0);
        assert!(clock.is_running());
    }

    #[test]
    fn test_first_frame_has_no_delta() {
        let mut clock = Clock::new(33);
        let frame = clock.advance(10_000);
        assert_eq!(frame.delta_ms, 0);
        assert_eq!(frame.ambient_ticks, 0);
        assert!(frame.step_physics);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_interval_accumulates() {
        let mut interval = Interval::new(33);
        assert_eq!(interval.advance(16), 0);
        assert_eq!(interval.advance(16), 0);
        assert_eq!(interval.advance(16), 1);
        assert_eq!(interval.advance(66), 2);
        // stalls are capped
        assert_eq!(interval.advance(10_000), MAX_CATCH_UP_TICKS);
        assert_eq!(interval.advance(0), 0);
    }

    #[test]
    fn test_pause_keeps_ambient_ticking() {
        let mut clock = Clock::new(33);
        clock.advance(0);
        clock.pause();
        let frame = clock.advance(100);
        assert!(!frame.step_physics);
        assert_eq!(frame.ambient_ticks, 3);
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let mut clock = Clock::new(33);
        let before = clock.is_running();
        clock.toggle_pause();
        clock.toggle_pause();
        assert_eq!(clock.is_running(), before);
    }

    #[test]
    fn test_fps() {
        let mut clock = Clock::new(33);
        for i in 0..=30 {
            clock.advance(i * 20);
        }
        // 25 frames in the first 500 ms
        assert!((clock.fps() - 50.0).abs() < 1.0);
    }
}
