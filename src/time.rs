//! Frame timing for the animation and detection loops.
//!
//! Real runs read the wall clock; tests and recordings use a fixed step so
//! every frame lands on a known time.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! // once per redraw:
//! let t = clock.tick();
//! ```

use std::time::{Duration, Instant};

/// Elapsed-time source for the per-frame callbacks.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// When the clock was created or last reset.
    start: Instant,
    /// Elapsed time at the last tick.
    elapsed: Duration,
    /// Frames ticked since start.
    frame_count: u64,
    /// Fixed step per tick instead of wall-clock time.
    fixed_step: Option<Duration>,
}

impl FrameClock {
    /// A wall-clock driven timer starting now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Duration::ZERO,
            frame_count: 0,
            fixed_step: None,
        }
    }

    /// A deterministic timer that advances `step` every tick.
    pub fn fixed(step: Duration) -> Self {
        Self {
            fixed_step: Some(step),
            ..Self::new()
        }
    }

    /// Advance one frame. Returns elapsed seconds.
    pub fn tick(&mut self) -> f32 {
        self.elapsed = match self.fixed_step {
            Some(step) => self.elapsed + step,
            None => self.start.elapsed(),
        };
        self.frame_count += 1;
        self.elapsed.as_secs_f32()
    }

    /// Seconds since start, as of the last tick.
    #[inline]
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Time since start, as of the last tick.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Frames ticked since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Restart from zero, keeping the stepping mode.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.elapsed = Duration::ZERO;
        self.frame_count = 0;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.seconds(), 0.0);
    }

    #[test]
    fn test_wall_clock_tick() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let t = clock.tick();

        assert!(t > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step() {
        let mut clock = FrameClock::fixed(Duration::from_millis(50));
        thread::sleep(Duration::from_millis(20));
        clock.tick();
        clock.tick();

        // Uses the fixed step regardless of actual time
        assert_eq!(clock.elapsed(), Duration::from_millis(100));
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::fixed(Duration::from_secs(1));
        clock.tick();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        clock.tick();
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }
}
