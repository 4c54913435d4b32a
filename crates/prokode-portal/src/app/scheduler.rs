//! Browser timers behind the core [`Scheduler`] seam.

use std::time::Duration;

use gloo_timers::callback::{Interval, Timeout};
use prokode_auth::{PortalEvent, Scheduler, SessionTrigger};

use super::{EventSink, now};
use crate::logic::timer_millis;

/// Live browser timer; dropping it cancels the timer.
pub(crate) struct BrowserTimer {
    _interval: Option<Interval>,
    _timeout: Option<Timeout>,
}

/// Scheduler firing [`PortalEvent::Trigger`] into the host.
pub(crate) struct BrowserScheduler {
    sink: EventSink,
}

impl BrowserScheduler {
    pub(crate) const fn new(sink: EventSink) -> Self {
        Self { sink }
    }

    fn fire(&self, trigger: SessionTrigger) -> impl Fn() + 'static {
        let sink = self.sink.clone();
        move || {
            sink.dispatch(PortalEvent::Trigger {
                trigger,
                at: now(),
            });
        }
    }
}

impl Scheduler for BrowserScheduler {
    type Handle = BrowserTimer;

    fn every(&self, period: Duration, trigger: SessionTrigger) -> BrowserTimer {
        BrowserTimer {
            _interval: Some(Interval::new(timer_millis(period), self.fire(trigger))),
            _timeout: None,
        }
    }

    fn after(&self, delay: Duration, trigger: SessionTrigger) -> BrowserTimer {
        let fire = self.fire(trigger);
        BrowserTimer {
            _interval: None,
            _timeout: Some(Timeout::new(timer_millis(delay), fire)),
        }
    }
}
