//! The background emulation loop and its shared-state ownership.
//!
//! One coarse lock guards the whole machine: the loop takes it once per
//! CPU step and once per rasterize, so the presentation thread can
//! interleave frame reads and key writes between steps and never observes
//! a torn update. Shutdown is cooperative: the running flag is checked
//! once per frame boundary, never mid-frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::{error, info};

use crate::clock::{Clock, FrameClock, WallClock};
use crate::nes::Nes;

/// Owns the shared machine and the thread driving it.
pub struct Emulator {
    nes: Arc<Mutex<Nes>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    speed: f32,
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_speed(1.0)
    }

    /// Emulator with a speed multiplier applied to the per-frame budget.
    pub fn with_speed(speed: f32) -> Self {
        Self {
            nes: Arc::new(Mutex::new(Nes::new())),
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
            speed,
        }
    }

    /// Handle to the shared machine. Callers lock it for the whole of each
    /// operation, reads included.
    pub fn nes(&self) -> Arc<Mutex<Nes>> {
        Arc::clone(&self.nes)
    }

    /// Spawn the frame loop. No-op when already running.
    pub fn start(&mut self) {
        if self.thread.is_some() {
            return;
        }
        self.running.store(true, Ordering::Release);
        let nes = Arc::clone(&self.nes);
        let running = Arc::clone(&self.running);
        let clock = FrameClock::new(WallClock::new(), self.speed);
        self.thread = Some(std::thread::spawn(move || {
            run_loop(&nes, &running, clock);
        }));
        info!("emulation thread started");
    }

    /// Ask the loop to exit at the next frame boundary and join it. The
    /// wait is bounded by one frame period plus any overrun.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                error!("emulation thread panicked");
            }
            info!("emulation thread stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl Drop for Emulator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One frame per iteration: burn the cycle budget one atomic step at a
/// time, rasterize once, raise the frame interrupt, then sleep the period
/// remainder. A poisoned lock is the unrecoverable fault: log and stop
/// rather than retry.
fn run_loop<C: Clock>(nes: &Mutex<Nes>, running: &AtomicBool, mut clock: FrameClock<C>) {
    while running.load(Ordering::Acquire) {
        let started = clock.start_frame();
        let budget = clock.budget();

        let mut spent = 0u64;
        while spent < budget {
            let Ok(mut machine) = nes.lock() else {
                error!("emulation state lock poisoned, stopping");
                running.store(false, Ordering::Release);
                return;
            };
            spent += machine.step() as u64;
        }

        match nes.lock() {
            Ok(mut machine) => {
                machine.render_frame();
                machine.raise_frame_interrupt();
            }
            Err(_) => {
                error!("emulation state lock poisoned, stopping");
                running.store(false, Ordering::Release);
                return;
            }
        }

        clock.finish_frame(started);
    }
}
