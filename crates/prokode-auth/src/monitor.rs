//! Session monitor: owns the re-validation and inactivity timers.
//!
//! # Design
//! - Timers are handles from a [`Scheduler`]; dropping a handle cancels it,
//!   which matches browser timer wrappers.
//! - Existing handles are dropped before new ones are created, so at most two
//!   timers are ever live.
//! - The monitor only decides *whether* to re-validate; the gate decides what
//!   a failed re-validation means.

use std::fmt;
use std::time::Duration;

use tracing::trace;

use crate::config::SessionPolicy;

/// DOM events that count as user activity.
pub const ACTIVITY_EVENTS: [&str; 5] = ["mousemove", "keydown", "scroll", "touchstart", "click"];

/// Reason a re-validation was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionTrigger {
    /// The periodic timer fired.
    Interval,
    /// The tab became visible.
    Visible,
    /// No activity for the inactivity window.
    Inactivity,
}

impl SessionTrigger {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interval => "interval",
            Self::Visible => "visible",
            Self::Inactivity => "inactivity",
        }
    }
}

impl fmt::Display for SessionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timer factory. Handles cancel their timer when dropped.
pub trait Scheduler {
    /// Live timer handle.
    type Handle;
    /// Fire `trigger` every `period`.
    fn every(&self, period: Duration, trigger: SessionTrigger) -> Self::Handle;
    /// Fire `trigger` once after `delay`.
    fn after(&self, delay: Duration, trigger: SessionTrigger) -> Self::Handle;
}

/// Re-validation timers for one authenticated session.
pub struct SessionMonitor<S: Scheduler> {
    scheduler: S,
    policy: SessionPolicy,
    interval: Option<S::Handle>,
    inactivity: Option<S::Handle>,
    running: bool,
}

impl<S: Scheduler> SessionMonitor<S> {
    /// Create a stopped monitor.
    pub const fn new(scheduler: S, policy: SessionPolicy) -> Self {
        Self {
            scheduler,
            policy,
            interval: None,
            inactivity: None,
            running: false,
        }
    }

    /// (Re)start both timers.
    pub fn start(&mut self) {
        self.stop();
        self.interval = Some(
            self.scheduler
                .every(self.policy.revalidate_interval(), SessionTrigger::Interval),
        );
        self.inactivity = Some(
            self.scheduler
                .after(self.policy.inactivity_timeout(), SessionTrigger::Inactivity),
        );
        self.running = true;
        trace!("session monitor started");
    }

    /// Cancel both timers.
    pub fn stop(&mut self) {
        self.interval = None;
        self.inactivity = None;
        if self.running {
            trace!("session monitor stopped");
        }
        self.running = false;
    }

    /// Whether the monitor is watching a session.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Number of live timer handles.
    #[must_use]
    pub fn live_timers(&self) -> usize {
        usize::from(self.interval.is_some()) + usize::from(self.inactivity.is_some())
    }

    /// Restart the inactivity countdown after user input.
    pub fn record_activity(&mut self) {
        if !self.running {
            return;
        }
        self.inactivity = None;
        self.inactivity = Some(
            self.scheduler
                .after(self.policy.inactivity_timeout(), SessionTrigger::Inactivity),
        );
    }

    /// Handle a timer firing; returns whether a re-validation should run.
    pub fn on_trigger(&mut self, trigger: SessionTrigger) -> bool {
        if !self.running {
            return false;
        }
        if trigger == SessionTrigger::Inactivity {
            // one-shot timer is spent; the next input re-arms it
            self.inactivity = None;
        }
        trace!(%trigger, "session trigger");
        true
    }

    /// Map a visibility change to a trigger when it should re-validate.
    #[must_use]
    pub const fn on_visibility_change(&self, visible: bool) -> Option<SessionTrigger> {
        if visible && self.running {
            Some(SessionTrigger::Visible)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct CountingScheduler {
        live: Rc<Cell<usize>>,
    }

    struct CountingHandle(Rc<Cell<usize>>);

    impl Drop for CountingHandle {
        fn drop(&mut self) {
            self.0.set(self.0.get() - 1);
        }
    }

    impl Scheduler for CountingScheduler {
        type Handle = CountingHandle;

        fn every(&self, _period: Duration, _trigger: SessionTrigger) -> CountingHandle {
            self.live.set(self.live.get() + 1);
            CountingHandle(self.live.clone())
        }

        fn after(&self, _delay: Duration, _trigger: SessionTrigger) -> CountingHandle {
            self.live.set(self.live.get() + 1);
            CountingHandle(self.live.clone())
        }
    }

    fn monitor() -> (SessionMonitor<CountingScheduler>, Rc<Cell<usize>>) {
        let scheduler = CountingScheduler::default();
        let live = scheduler.live.clone();
        (
            SessionMonitor::new(scheduler, SessionPolicy::default()),
            live,
        )
    }

    #[test]
    fn restart_never_leaks_timers() {
        let (mut monitor, live) = monitor();
        for _ in 0..10 {
            monitor.start();
            assert_eq!(live.get(), 2);
        }
        monitor.stop();
        assert_eq!(live.get(), 0);
        assert_eq!(monitor.live_timers(), 0);
    }

    #[test]
    fn activity_rearms_inactivity_only_while_running() {
        let (mut monitor, live) = monitor();
        monitor.record_activity();
        assert_eq!(live.get(), 0);
        monitor.start();
        monitor.record_activity();
        monitor.record_activity();
        assert_eq!(live.get(), 2);
    }

    #[test]
    fn triggers_are_ignored_when_stopped() {
        let (mut monitor, _live) = monitor();
        assert!(!monitor.on_trigger(SessionTrigger::Interval));
        assert_eq!(monitor.on_visibility_change(true), None);
        monitor.start();
        assert!(monitor.on_trigger(SessionTrigger::Interval));
        assert_eq!(
            monitor.on_visibility_change(true),
            Some(SessionTrigger::Visible)
        );
        assert_eq!(monitor.on_visibility_change(false), None);
    }

    #[test]
    fn inactivity_fire_releases_its_handle() {
        let (mut monitor, live) = monitor();
        monitor.start();
        assert!(monitor.on_trigger(SessionTrigger::Inactivity));
        assert_eq!(live.get(), 1);
        monitor.record_activity();
        assert_eq!(live.get(), 2);
    }
}
