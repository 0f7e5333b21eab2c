//! Frame pacing: a fixed-timestep schedule with an injectable time source.
//!
//! [`FrameClock`] owns the per-frame cycle budget and the target period.
//! The [`Clock`] trait hides the wall clock so pacing is testable without
//! real delays; production code uses [`WallClock`].

use std::time::{Duration, Instant};

/// NTSC CPU cycles per frame (~60 fps).
pub const CYCLES_PER_FRAME: u32 = 29_780;
/// Target frame period: one frame per 16.67 ms for ~60 fps.
pub const FRAME_PERIOD: Duration = Duration::from_nanos(16_666_667);

/// Monotonic time source the frame clock paces against.
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&mut self) -> Duration;
    /// Block for the given duration.
    fn sleep(&mut self, dur: Duration);
}

/// Production clock: `Instant` plus `thread::sleep`.
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Fixed-timestep frame pacing: a cycle budget per frame, then a sleep for
/// the non-negative remainder of the period. A frame that overruns skips
/// its sleep and runs long; speed degrades rather than blocking anything.
pub struct FrameClock<C: Clock> {
    clock: C,
    period: Duration,
    cycles_per_frame: u32,
    speed: f32,
}

impl<C: Clock> FrameClock<C> {
    /// Frame clock at the standard period with a speed multiplier applied
    /// to the cycle budget.
    pub fn new(clock: C, speed: f32) -> Self {
        Self {
            clock,
            period: FRAME_PERIOD,
            cycles_per_frame: CYCLES_PER_FRAME,
            speed,
        }
    }

    /// Cycle budget for one frame: base cycles × speed multiplier.
    pub fn budget(&self) -> u64 {
        (self.cycles_per_frame as f32 * self.speed) as u64
    }

    /// Mark the start of a frame; hand the stamp back to [`Self::finish_frame`].
    pub fn start_frame(&mut self) -> Duration {
        self.clock.now()
    }

    /// Sleep away whatever remains of the frame period, if anything.
    pub fn finish_frame(&mut self, started: Duration) {
        let elapsed = self.clock.now().saturating_sub(started);
        let remaining = self.period.saturating_sub(elapsed);
        if !remaining.is_zero() {
            self.clock.sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Test clock: every `now()` advances by a fixed amount, sleeps are
    /// recorded and also advance time.
    struct FakeClock {
        now: Duration,
        advance: Duration,
        slept: Rc<RefCell<Vec<Duration>>>,
    }

    impl Clock for FakeClock {
        fn now(&mut self) -> Duration {
            let t = self.now;
            self.now += self.advance;
            t
        }

        fn sleep(&mut self, dur: Duration) {
            self.slept.borrow_mut().push(dur);
            self.now += dur;
        }
    }

    fn fake(advance: Duration) -> (FakeClock, Rc<RefCell<Vec<Duration>>>) {
        let slept = Rc::new(RefCell::new(Vec::new()));
        (
            FakeClock {
                now: Duration::ZERO,
                advance,
                slept: Rc::clone(&slept),
            },
            slept,
        )
    }

    #[test]
    fn budget_scales_with_speed() {
        let (clock, _) = fake(Duration::ZERO);
        assert_eq!(FrameClock::new(clock, 1.0).budget(), 29_780);
        let (clock, _) = fake(Duration::ZERO);
        assert_eq!(FrameClock::new(clock, 2.0).budget(), 59_560);
    }

    #[test]
    fn fast_frame_sleeps_the_remainder() {
        let (clock, slept) = fake(Duration::from_millis(5));
        let mut frame_clock = FrameClock::new(clock, 1.0);

        let started = frame_clock.start_frame();
        frame_clock.finish_frame(started);

        let slept = slept.borrow();
        assert_eq!(slept.len(), 1);
        assert_eq!(slept[0], FRAME_PERIOD - Duration::from_millis(5));
    }

    #[test]
    fn overrunning_frame_skips_its_sleep() {
        let (clock, slept) = fake(Duration::from_millis(20));
        let mut frame_clock = FrameClock::new(clock, 1.0);

        let started = frame_clock.start_frame();
        frame_clock.finish_frame(started);

        assert!(slept.borrow().is_empty());
    }
}
