//! One-shot delayed actions counted against the simulation frame delta.
//!
//! Timers carry plain data instead of closures; whoever owns the scheduler
//! dispatches fired actions and is responsible for ignoring actions whose
//! target no longer exists. There is no cancellation.

#[derive(Clone, Debug)]
struct Timer<A> {
    duration: f32,
    elapsed: f32,
    action: A,
}

#[derive(Clone, Debug)]
pub struct TimerScheduler<A> {
    timers: Vec<Timer<A>>,
}

impl<A> Default for TimerScheduler<A> {
    fn default() -> Self {
        Self { timers: Vec::new() }
    }
}

impl<A> TimerScheduler<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, duration_seconds: f32, action: A) {
        self.timers.push(Timer { duration: duration_seconds, elapsed: 0.0, action });
    }

    /// Advances every timer and returns the actions that expired this tick, in insertion order.
    pub fn tick(&mut self, delta_seconds: f32) -> Vec<A> {
        let mut fired = Vec::new();
        let mut pending = Vec::with_capacity(self.timers.len());
        for mut timer in self.timers.drain(..) {
            timer.elapsed += delta_seconds;
            if timer.elapsed >= timer.duration {
                fired.push(timer.action);
            } else {
                pending.push(timer);
            }
        }
        self.timers = pending;
        fired
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
