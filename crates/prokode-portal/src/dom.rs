//! Page view backed by the live document.
//!
//! # Design
//! - Visibility is toggled with the `hidden` attribute; styling stays in CSS.
//! - The login panel text lives in the yewdux store; this view only flips it.
//! - Missing contract elements are logged at debug and skipped.

use gloo::utils::document;
use prokode_auth::{Badge, Identity, PageView, ResourceCard, RoleSurface};
use tracing::debug;
use web_sys::Element;
use yewdux::prelude::Dispatch;

use crate::dom_ids::{
    LOGIN_OVERLAY, PROTECTED_CONTENT, RESOURCE_GRID, ROLE_LABEL, STATUS_BAR, USER_NAME,
};
use crate::store::PortalStore;

/// [`PageView`] and [`RoleSurface`] over `document`.
pub(crate) struct DomPage {
    store: Dispatch<PortalStore>,
    inserted: Vec<String>,
}

impl DomPage {
    pub(crate) fn new() -> Self {
        Self {
            store: Dispatch::new(),
            inserted: Vec::new(),
        }
    }
}

pub(crate) fn element(id: &'static str) -> Option<Element> {
    let found = document().get_element_by_id(id);
    if found.is_none() {
        debug!(id, "page element missing");
    }
    found
}

pub(crate) fn set_hidden(id: &'static str, hidden: bool) {
    if let Some(element) = element(id) {
        toggle_attribute(&element, "hidden", hidden);
    }
}

/// Add or remove a boolean attribute.
pub(crate) fn toggle_attribute(element: &Element, name: &'static str, present: bool) {
    let result = if present {
        element.set_attribute(name, "")
    } else {
        element.remove_attribute(name)
    };
    if result.is_err() {
        debug!(id = %element.id(), attribute = name, "failed to toggle attribute");
    }
}

pub(crate) fn set_attribute(element: &Element, name: &'static str, value: &str) {
    if element.set_attribute(name, value).is_err() {
        debug!(id = %element.id(), attribute = name, "failed to set attribute");
    }
}

fn set_text(id: &'static str, text: Option<&str>) {
    if let Some(element) = element(id) {
        element.set_text_content(text);
    }
}

fn create(tag: &str, id: &str, class: &str) -> Option<Element> {
    let element = document().create_element(tag).ok()?;
    element.set_id(id);
    element.set_class_name(class);
    Some(element)
}

impl PageView for DomPage {
    fn show_loading(&mut self) {
        self.store.reduce_mut(|store| store.login.loading());
        set_hidden(PROTECTED_CONTENT, true);
        set_hidden(LOGIN_OVERLAY, false);
    }

    fn show_sign_in(&mut self, notice: Option<&str>) {
        self.store.reduce_mut(|store| store.login.sign_in(notice));
        set_text(USER_NAME, None);
        set_hidden(PROTECTED_CONTENT, true);
        set_hidden(LOGIN_OVERLAY, false);
    }

    fn show_protected(&mut self, identity: &Identity) {
        self.store.reduce_mut(|store| store.login.signed_in());
        if let Some(element) = element(USER_NAME) {
            element.set_text_content(Some(identity.display_name()));
            set_attribute(&element, "data-initials", &identity.initials());
            if let Some(email) = &identity.email {
                set_attribute(&element, "title", email);
            }
        }
        set_hidden(LOGIN_OVERLAY, true);
        set_hidden(PROTECTED_CONTENT, false);
    }

    fn show_sign_in_error(&mut self, message: &str) {
        self.store.reduce_mut(|store| store.login.failed(message));
    }
}

impl RoleSurface for DomPage {
    fn contains(&self, element_id: &str) -> bool {
        document().get_element_by_id(element_id).is_some()
    }

    fn append_badge(&mut self, badge: &Badge) {
        let Some(bar) = element(STATUS_BAR) else {
            return;
        };
        let Some(node) = create("span", &badge.id, "role-badge") else {
            return;
        };
        set_attribute(&node, "data-group", &badge.group);
        node.set_text_content(Some(&badge.text));
        if bar.append_child(&node).is_ok() {
            self.inserted.push(badge.id.clone());
        }
    }

    fn append_card(&mut self, card: &ResourceCard) {
        let Some(grid) = element(RESOURCE_GRID) else {
            return;
        };
        let Some(link) = create("a", &card.id, "resource-card") else {
            return;
        };
        set_attribute(&link, "href", &card.href);
        let (Ok(title), Ok(body)) = (
            document().create_element("h3"),
            document().create_element("p"),
        ) else {
            return;
        };
        title.set_text_content(Some(&card.title));
        body.set_text_content(Some(&card.description));
        if link.append_child(&title).is_err() || link.append_child(&body).is_err() {
            return;
        }
        if grid.append_child(&link).is_ok() {
            self.inserted.push(card.id.clone());
        }
    }

    fn set_role_label(&mut self, label: Option<&str>) {
        set_text(ROLE_LABEL, label);
    }

    fn clear_roles(&mut self) {
        for id in self.inserted.drain(..) {
            if let Some(node) = document().get_element_by_id(&id) {
                node.remove();
            }
        }
        set_text(ROLE_LABEL, None);
    }
}
