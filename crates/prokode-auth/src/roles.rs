//! Group-driven presentation: role label, badges and resource cards.
//!
//! This is cosmetic. Everything ships to the browser, so removing these
//! elements changes nothing about access.

use crate::config::{RolePolicy, RoleRule};
use crate::identity::Identity;

/// Badge appended to the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    /// Element id, stable per group.
    pub id: String,
    /// Badge text.
    pub text: String,
    /// Group that earned the badge.
    pub group: String,
}

/// Resource card appended to the resource grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceCard {
    /// Element id, stable per title.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Link target.
    pub href: String,
}

/// Everything a group list projects to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleProjection {
    /// Label of the highest-priority matching rule.
    pub label: Option<String>,
    /// Badges in rule priority order.
    pub badges: Vec<Badge>,
    /// Cards in rule priority order.
    pub cards: Vec<ResourceCard>,
}

/// Page region that receives role elements.
pub trait RoleSurface {
    /// Whether an element with this id is already on the page.
    fn contains(&self, element_id: &str) -> bool;
    /// Append a badge to the status bar.
    fn append_badge(&mut self, badge: &Badge);
    /// Append a card to the resource grid.
    fn append_card(&mut self, card: &ResourceCard);
    /// Show or clear the role label.
    fn set_role_label(&mut self, label: Option<&str>);
    /// Remove every element this projector added.
    fn clear_roles(&mut self);
}

/// Maps groups to presentation using priority-ordered rules.
#[derive(Clone, Debug)]
pub struct RoleProjector {
    rules: Vec<RoleRule>,
}

impl RoleProjector {
    /// Build from the configured policy.
    #[must_use]
    pub fn new(policy: &RolePolicy) -> Self {
        Self {
            rules: policy.rules.clone(),
        }
    }

    /// Pure projection of a group list.
    #[must_use]
    pub fn project(&self, groups: &[String]) -> RoleProjection {
        let mut projection = RoleProjection::default();
        for rule in self
            .rules
            .iter()
            .filter(|rule| groups.iter().any(|group| *group == rule.group))
        {
            if projection.label.is_none() {
                projection.label = Some(rule.label.clone());
            }
            if let Some(text) = &rule.badge {
                projection.badges.push(Badge {
                    id: element_id("role-badge", &rule.group),
                    text: text.clone(),
                    group: rule.group.clone(),
                });
            }
            projection
                .cards
                .extend(rule.cards.iter().map(|card| ResourceCard {
                    id: element_id("resource-card", &card.title),
                    title: card.title.clone(),
                    description: card.description.clone(),
                    href: card.href.clone(),
                }));
        }
        projection
    }

    /// Project `identity` onto `surface`, skipping elements already present.
    ///
    /// Returns the number of elements inserted.
    pub fn apply<R: RoleSurface + ?Sized>(&self, identity: &Identity, surface: &mut R) -> usize {
        let projection = self.project(&identity.groups);
        surface.set_role_label(projection.label.as_deref());
        let mut inserted = 0;
        for badge in &projection.badges {
            if !surface.contains(&badge.id) {
                surface.append_badge(badge);
                inserted += 1;
            }
        }
        for card in &projection.cards {
            if !surface.contains(&card.id) {
                surface.append_card(card);
                inserted += 1;
            }
        }
        inserted
    }
}

/// Lowercase, dash-separated element id.
fn element_id(prefix: &str, name: &str) -> String {
    let mut slug = String::with_capacity(prefix.len() + name.len() + 1);
    slug.push_str(prefix);
    let mut pending_dash = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn first_matching_rule_names_the_label() {
        let projector = RoleProjector::new(&RolePolicy::default());
        let projection = projector.project(&groups(&["Everyone", "Developers"]));
        assert_eq!(projection.label.as_deref(), Some("Developer"));
        assert_eq!(projection.badges.len(), 1);
        assert_eq!(projection.badges[0].id, "role-badge-developers");
    }

    #[test]
    fn admin_projection_has_one_badge_and_cards() {
        let projector = RoleProjector::new(&RolePolicy::default());
        let projection = projector.project(&groups(&["IAM-Admins"]));
        assert_eq!(projection.label.as_deref(), Some("Administrator"));
        assert_eq!(projection.badges.len(), 1);
        assert_eq!(projection.badges[0].id, "role-badge-iam-admins");
        assert_eq!(projection.cards.len(), 2);
    }

    #[test]
    fn unknown_groups_project_nothing() {
        let projector = RoleProjector::new(&RolePolicy::default());
        assert_eq!(
            projector.project(&groups(&["Contractors"])),
            RoleProjection::default()
        );
        assert_eq!(projector.project(&[]), RoleProjection::default());
    }

    #[test]
    fn element_ids_are_slugged() {
        assert_eq!(element_id("resource-card", "Admin Console"), "resource-card-admin-console");
        assert_eq!(element_id("role-badge", "  IAM__Admins "), "role-badge-iam-admins");
    }
}
