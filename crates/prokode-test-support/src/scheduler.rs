//! Scheduler fake that counts live timers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use prokode_auth::{Scheduler, SessionTrigger};

/// Scheduler whose timers never fire on their own; tests inject triggers.
#[derive(Clone, Debug, Default)]
pub struct FakeScheduler {
    live: Rc<Cell<usize>>,
    armed: Rc<RefCell<Vec<(SessionTrigger, Duration)>>>,
}

/// Observer for a [`FakeScheduler`] that has been moved into a portal.
#[derive(Clone, Debug)]
pub struct TimerProbe {
    live: Rc<Cell<usize>>,
    armed: Rc<RefCell<Vec<(SessionTrigger, Duration)>>>,
}

impl TimerProbe {
    /// Timers currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Every timer ever armed, in order.
    #[must_use]
    pub fn armed(&self) -> Vec<(SessionTrigger, Duration)> {
        self.armed.borrow().clone()
    }
}

impl FakeScheduler {
    /// Probe sharing this scheduler's counters.
    #[must_use]
    pub fn probe(&self) -> TimerProbe {
        TimerProbe {
            live: self.live.clone(),
            armed: self.armed.clone(),
        }
    }

    fn arm(&self, trigger: SessionTrigger, duration: Duration) -> FakeTimer {
        self.live.set(self.live.get() + 1);
        self.armed.borrow_mut().push((trigger, duration));
        FakeTimer {
            live: self.live.clone(),
        }
    }
}

/// Handle that decrements the live count when dropped.
#[derive(Debug)]
pub struct FakeTimer {
    live: Rc<Cell<usize>>,
}

impl Drop for FakeTimer {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
    }
}

impl Scheduler for FakeScheduler {
    type Handle = FakeTimer;

    fn every(&self, period: Duration, trigger: SessionTrigger) -> FakeTimer {
        self.arm(trigger, period)
    }

    fn after(&self, delay: Duration, trigger: SessionTrigger) -> FakeTimer {
        self.arm(trigger, delay)
    }
}
