//! Layered configuration loading for the browser.

use gloo::utils::window;
use gloo_net::http::Request;
use js_sys::Reflect;
use prokode_auth::{PortalConfig, RuntimeOverrides, defaults};
use tracing::{debug, warn};
use wasm_bindgen::JsValue;

/// Global the hosting page may set before the bundle loads.
const RUNTIME_GLOBAL: &str = "PROKODE_CONFIG";

/// Defaults, then the fetched document, then `window.PROKODE_CONFIG`.
///
/// Every failure falls back to the previous layer; an invalid merge falls back
/// to the defaults.
pub(crate) async fn load_config() -> PortalConfig {
    let mut config = match fetch_document(defaults::CONFIG_URL).await {
        Ok(config) => {
            debug!(url = defaults::CONFIG_URL, "loaded portal configuration");
            config
        }
        Err(err) => {
            warn!(url = defaults::CONFIG_URL, error = %err, "using default portal configuration");
            PortalConfig::default()
        }
    };
    config.apply_overrides(runtime_overrides());
    if let Err(err) = config.validate() {
        warn!(error = %err, detail = ?err, "runtime overrides rejected; using defaults");
        return PortalConfig::default();
    }
    config
}

async fn fetch_document(url: &str) -> anyhow::Result<PortalConfig> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        anyhow::bail!("status {}", response.status());
    }
    let body = response.text().await?;
    Ok(PortalConfig::from_json(&body)?)
}

fn runtime_overrides() -> RuntimeOverrides {
    let Some(source) = Reflect::get(&window(), &JsValue::from_str(RUNTIME_GLOBAL))
        .ok()
        .filter(|value| value.is_object())
    else {
        return RuntimeOverrides::default();
    };
    let read = |key: &str| {
        Reflect::get(&source, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_string())
    };
    RuntimeOverrides {
        issuer: read("issuer"),
        base_url: read("baseUrl"),
        client_id: read("clientId"),
        redirect_uri: read("redirectUri"),
        log_level: read("logLevel"),
    }
}
