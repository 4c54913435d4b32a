//! In-memory page that records what the portal rendered.

use prokode_auth::{Badge, Identity, PageView, ResourceCard, RoleSurface};

/// Recorded page state.
#[derive(Clone, Debug, Default)]
pub struct RecordingPage {
    /// Loading indicator shown.
    pub loading: bool,
    /// Login overlay shown.
    pub login_visible: bool,
    /// Protected content shown.
    pub content_visible: bool,
    /// Text of the user-name label.
    pub user_label: Option<String>,
    /// Notice shown above the login form.
    pub notice: Option<String>,
    /// Current sign-in error message.
    pub error: Option<String>,
    /// Role label in the status bar.
    pub role_label: Option<String>,
    /// Badges currently on the page.
    pub badges: Vec<Badge>,
    /// Cards currently on the page.
    pub cards: Vec<ResourceCard>,
    /// How many times the login view was rendered.
    pub sign_in_renders: usize,
    /// Total badge and card insertions ever made.
    pub insertions: usize,
}

impl RecordingPage {
    /// Badges belonging to `group`.
    #[must_use]
    pub fn badges_for(&self, group: &str) -> usize {
        self.badges.iter().filter(|badge| badge.group == group).count()
    }
}

impl PageView for RecordingPage {
    fn show_loading(&mut self) {
        self.loading = true;
        self.login_visible = false;
        self.content_visible = false;
    }

    fn show_sign_in(&mut self, notice: Option<&str>) {
        self.loading = false;
        self.login_visible = true;
        self.content_visible = false;
        self.user_label = None;
        self.error = None;
        self.notice = notice.map(ToString::to_string);
        self.sign_in_renders += 1;
    }

    fn show_protected(&mut self, identity: &Identity) {
        self.loading = false;
        self.login_visible = false;
        self.content_visible = true;
        self.notice = None;
        self.error = None;
        self.user_label = Some(identity.display_name().to_string());
    }

    fn show_sign_in_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }
}

impl RoleSurface for RecordingPage {
    fn contains(&self, element_id: &str) -> bool {
        self.badges.iter().any(|badge| badge.id == element_id)
            || self.cards.iter().any(|card| card.id == element_id)
    }

    fn append_badge(&mut self, badge: &Badge) {
        self.badges.push(badge.clone());
        self.insertions += 1;
    }

    fn append_card(&mut self, card: &ResourceCard) {
        self.cards.push(card.clone());
        self.insertions += 1;
    }

    fn set_role_label(&mut self, label: Option<&str>) {
        self.role_label = label.map(ToString::to_string);
    }

    fn clear_roles(&mut self) {
        self.badges.clear();
        self.cards.clear();
        self.role_label = None;
    }
}
