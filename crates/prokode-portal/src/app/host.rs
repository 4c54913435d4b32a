//! Host that runs the portal core against the live page.
//!
//! # Design
//! - The core is borrowed only for the duration of one `handle` call; widget
//!   requests run after the borrow is released.
//! - Listeners and timers reach the host through [`EventSink`], a weak
//!   handle, so nothing but the unload listener keeps the host alive.
//! - Teardown happens on `pagehide`.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::utils::{document, window};
use gloo_timers::future::TimeoutFuture;
use prokode_auth::{
    ACTIVITY_EVENTS, Portal, PortalConfig, PortalEvent, PortalResult, WidgetRequest,
};
use tracing::{debug, info, warn};
use yew::platform::spawn_local;

use super::now;
use super::scheduler::BrowserScheduler;
use crate::dom::{DomPage, element};
use crate::dom_ids::LOGOUT_BUTTON;
use crate::features;
use crate::logic::{ActivityThrottle, timer_millis};
use crate::widget::SignInWidget;

type PortalCore = Portal<DomPage, BrowserScheduler>;

/// Weak route from browser callbacks back into the host.
#[derive(Clone)]
pub(crate) struct EventSink(Weak<PortalHost>);

impl EventSink {
    /// Feed an event to the host if it is still alive.
    pub(crate) fn dispatch(&self, event: PortalEvent) {
        if let Some(host) = self.0.upgrade() {
            host.dispatch(event);
        }
    }

    fn activity(&self) {
        if let Some(host) = self.0.upgrade()
            && host.admit_activity()
        {
            host.dispatch(PortalEvent::Activity);
        }
    }
}

/// Owns the portal core, the widget and page-level listeners.
pub(crate) struct PortalHost {
    portal: RefCell<PortalCore>,
    widget: OnceCell<Rc<SignInWidget>>,
    listeners: RefCell<Vec<EventListener>>,
    throttle: Cell<ActivityThrottle>,
}

impl PortalHost {
    /// Build the core and construct the widget.
    ///
    /// # Errors
    ///
    /// Returns the widget construction error; the caller renders the fatal page.
    pub(crate) fn create(config: &PortalConfig) -> PortalResult<Rc<Self>> {
        let host = Rc::new_cyclic(|weak: &Weak<Self>| {
            let sink = EventSink(weak.clone());
            Self {
                portal: RefCell::new(Portal::create(
                    config,
                    DomPage::new(),
                    BrowserScheduler::new(sink.clone()),
                    features::all(sink),
                )),
                widget: OnceCell::new(),
                listeners: RefCell::new(Vec::new()),
                throttle: Cell::new(ActivityThrottle::default()),
            }
        });
        let sink = host.sink();
        let widget = SignInWidget::construct(&config.widget, move |failure| {
            sink.dispatch(PortalEvent::SignInFailed { failure });
        })?;
        if host.widget.set(Rc::new(widget)).is_err() {
            debug!("sign-in widget already attached");
        }
        Ok(host)
    }

    /// Attach page listeners and begin restoring a session.
    pub(crate) fn start(self: &Rc<Self>) {
        self.attach_listeners();
        let requests = match self.portal.try_borrow_mut() {
            Ok(mut portal) => portal.start(),
            Err(_) => {
                warn!("portal busy at start");
                return;
            }
        };
        info!("portal started");
        self.execute(requests);
    }

    fn sink(self: &Rc<Self>) -> EventSink {
        EventSink(Rc::downgrade(self))
    }

    fn dispatch(self: &Rc<Self>, event: PortalEvent) {
        let requests = match self.portal.try_borrow_mut() {
            Ok(mut portal) => portal.handle(event),
            Err(_) => {
                // re-entrant call from inside a transition; retry on the next tick
                let host = Rc::clone(self);
                spawn_local(async move { host.dispatch(event) });
                return;
            }
        };
        self.execute(requests);
    }

    fn admit_activity(&self) -> bool {
        let mut throttle = self.throttle.get();
        let admitted = throttle.admit(js_sys::Date::now());
        self.throttle.set(throttle);
        admitted
    }

    fn execute(self: &Rc<Self>, requests: Vec<WidgetRequest>) {
        let Some(widget) = self.widget.get().cloned() else {
            if !requests.is_empty() {
                warn!(count = requests.len(), "widget not ready; dropping requests");
            }
            return;
        };
        for request in requests {
            let host = Rc::clone(self);
            let widget = Rc::clone(&widget);
            match request {
                WidgetRequest::RestoreSession { ticket, delay } => spawn_local(async move {
                    if !delay.is_zero() {
                        TimeoutFuture::new(timer_millis(delay)).await;
                    }
                    let outcome = widget.restore().await;
                    host.dispatch(PortalEvent::SessionRestored { ticket, outcome });
                }),
                WidgetRequest::ShowSignIn => spawn_local(async move {
                    let event = match widget.sign_in().await {
                        Ok(identity) => PortalEvent::SignInSucceeded { identity },
                        Err(failure) => PortalEvent::SignInFailed { failure },
                    };
                    host.dispatch(event);
                }),
                WidgetRequest::Revalidate { ticket } => spawn_local(async move {
                    let outcome = widget.revalidate().await;
                    host.dispatch(PortalEvent::Revalidated { ticket, outcome });
                }),
                WidgetRequest::ClearTokens => widget.clear_tokens(),
                WidgetRequest::ConfirmLogout { prompt } => {
                    let confirmed = gloo::dialogs::confirm(&prompt);
                    host.dispatch(PortalEvent::LogoutConfirmed { confirmed });
                }
            }
        }
    }

    fn attach_listeners(self: &Rc<Self>) {
        let mut listeners = self.listeners.borrow_mut();
        let document = document();
        for name in ACTIVITY_EVENTS {
            let sink = self.sink();
            listeners.push(EventListener::new(&document, name, move |_| sink.activity()));
        }

        let sink = self.sink();
        listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
            sink.dispatch(PortalEvent::VisibilityChanged {
                visible: !gloo::utils::document().hidden(),
                at: now(),
            });
        }));

        if let Some(button) = element(LOGOUT_BUTTON) {
            let sink = self.sink();
            listeners.push(EventListener::new(&button, "click", move |_| {
                sink.dispatch(PortalEvent::LogoutRequested);
            }));
        }

        // the unload listener owns the host until teardown
        let host = Rc::clone(self);
        EventListener::once(&window(), "pagehide", move |_| host.teardown()).forget();
    }

    fn teardown(&self) {
        match self.portal.try_borrow_mut() {
            Ok(mut portal) => portal.teardown(),
            Err(_) => warn!("portal busy during teardown"),
        }
        self.listeners.borrow_mut().clear();
        if let Some(widget) = self.widget.get() {
            widget.remove();
        }
        debug!("portal host torn down");
    }
}
