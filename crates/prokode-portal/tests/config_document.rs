use prokode_auth::{PortalConfig, StaleResponsePolicy, defaults};
use prokode_portal::logic::widget_options;

const SHIPPED: &str = include_str!("../portal-config.json");

#[test]
fn shipped_config_document_is_valid() -> anyhow::Result<()> {
    let config = PortalConfig::from_json(SHIPPED)?;
    assert_eq!(config.session.stale_responses, StaleResponsePolicy::Discard);
    assert_eq!(
        config.session.revalidate_interval_secs,
        defaults::REVALIDATE_INTERVAL_SECS
    );
    // roles are not in the document, so the built-in rules apply
    assert_eq!(config.roles, PortalConfig::default().roles);
    Ok(())
}

#[test]
fn shipped_config_builds_widget_options() -> anyhow::Result<()> {
    let config = PortalConfig::from_json(SHIPPED)?;
    let options = widget_options(&config.widget);
    assert_eq!(options["authParams"]["issuer"], config.widget.issuer.as_str());
    assert!(options["helpLinks"]["forgotPassword"].is_string());
    Ok(())
}
