//! Module to throttle the frame tick rate after a period of inactivity.

use super::TickSource;
use log::debug;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Coalesces rapid signals into a single trailing action after a quiet
/// period.
///
/// The deadline is polled from the frame loop rather than scheduled on a
/// timer, keeping everything on the same execution context.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            deadline: None,
        }
    }

    /// Starts or restarts the quiet period from the given time.
    pub fn restart(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Checks whether a quiet period is currently pending.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true when the quiet period has elapsed, at most once per
    /// [`restart`](Self::restart) cycle.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Drops the tick rate to a trickle once no activity has been signaled for a
/// fixed idle window, and restores the full rate as soon as activity
/// resumes.
pub struct RefreshRateController {
    ticks: Rc<dyn TickSource>,
    debouncer: Debouncer,
}

impl RefreshRateController {
    /// Idle window after which the tick rate is lowered.
    pub const IDLE_WINDOW: Duration = Duration::from_secs(30);
    /// Tick rate while idle.
    pub const IDLE_FRAMES_PER_SECOND: u32 = 1;
    /// Rate value restoring the platform's default full rate.
    pub const FULL_RATE: u32 = 0;

    /// Creates a controller over the given tick source, with the default
    /// idle window.
    pub fn new(ticks: Rc<dyn TickSource>) -> Self {
        Self::with_idle_window(ticks, Self::IDLE_WINDOW)
    }

    /// Creates a controller with a custom idle window.
    pub fn with_idle_window(ticks: Rc<dyn TickSource>, idle_window: Duration) -> Self {
        RefreshRateController {
            ticks,
            debouncer: Debouncer::new(idle_window),
        }
    }

    /// Signals activity: restores the full tick rate and restarts the idle
    /// window.
    pub fn on_activity(&mut self, now: Instant) {
        self.ticks.set_frames_per_second(Self::FULL_RATE);
        self.debouncer.restart(now);
    }

    /// Polls the idle window; lowers the tick rate once it elapses.
    pub fn poll(&mut self, now: Instant) {
        if self.debouncer.poll(now) {
            debug!(
                "Idle for {:?}, lowering tick rate to {} fps",
                self.debouncer.delay,
                Self::IDLE_FRAMES_PER_SECOND
            );
            self.ticks
                .set_frames_per_second(Self::IDLE_FRAMES_PER_SECOND);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::RefCell;

    /// Tick source recording every rate adjustment.
    #[derive(Default)]
    struct RecordingTicks {
        rates: RefCell<Vec<u32>>,
    }

    impl TickSource for RecordingTicks {
        fn set_frames_per_second(&self, frames_per_second: u32) {
            self.rates.borrow_mut().push(frames_per_second);
        }
    }

    #[test]
    fn debouncer_fires_once_after_the_delay() {
        let mut debouncer = Debouncer::new(Duration::from_secs(30));
        let start = Instant::now();

        debouncer.restart(start);
        assert!(!debouncer.poll(start + Duration::from_secs(29)));
        assert!(debouncer.poll(start + Duration::from_secs(30)));
        // Already fired: no further firing without a restart.
        assert!(!debouncer.poll(start + Duration::from_secs(60)));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn rapid_restarts_coalesce_into_one_firing() {
        let window = Duration::from_secs(30);
        let mut debouncer = Debouncer::new(window);
        let start = Instant::now();

        // Activity at t = 0, 0.5W and 0.9W.
        debouncer.restart(start);
        debouncer.restart(start + window / 2);
        debouncer.restart(start + window * 9 / 10);

        // Nothing before 0.9W + W.
        assert!(!debouncer.poll(start + window));
        assert!(!debouncer.poll(start + window * 18 / 10));

        // One firing at 0.9W + W, and only one.
        assert!(debouncer.poll(start + window * 19 / 10));
        assert!(!debouncer.poll(start + window * 3));
    }

    #[test]
    fn debouncer_can_start_a_fresh_cycle_after_firing() {
        let mut debouncer = Debouncer::new(Duration::from_secs(1));
        let start = Instant::now();

        debouncer.restart(start);
        assert!(debouncer.poll(start + Duration::from_secs(1)));

        debouncer.restart(start + Duration::from_secs(5));
        assert!(!debouncer.poll(start + Duration::from_secs(5)));
        assert!(debouncer.poll(start + Duration::from_secs(6)));
    }

    #[test]
    fn controller_restores_full_rate_on_activity_and_lowers_when_idle() {
        let ticks = Rc::new(RecordingTicks::default());
        let mut controller =
            RefreshRateController::with_idle_window(ticks.clone(), Duration::from_secs(30));
        let start = Instant::now();

        controller.on_activity(start);
        controller.on_activity(start + Duration::from_secs(15));
        controller.on_activity(start + Duration::from_secs(27));

        // Polling before the window elapses does nothing.
        for s in 0..57 {
            controller.poll(start + Duration::from_secs(s));
        }
        assert_eq!(ticks.rates.borrow().as_slice(), &[0, 0, 0]);

        // The window elapsed 30s after the last activity: one rate drop.
        controller.poll(start + Duration::from_secs(57));
        assert_eq!(ticks.rates.borrow().as_slice(), &[0, 0, 0, 1]);

        // Still idle: no repeated drops.
        controller.poll(start + Duration::from_secs(120));
        assert_eq!(ticks.rates.borrow().as_slice(), &[0, 0, 0, 1]);

        // New activity restores the full rate.
        controller.on_activity(start + Duration::from_secs(130));
        assert_eq!(ticks.rates.borrow().as_slice(), &[0, 0, 0, 1, 0]);
    }
}
