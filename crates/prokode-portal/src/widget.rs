//! Bindings to the vendor sign-in widget loaded on the page.
//!
//! # Design
//! - The widget is reached through `Reflect` so a missing or partial script
//!   surfaces as a typed error instead of a JS exception.
//! - Every async call maps to a [`WidgetOutcome`]; no JS value leaks past
//!   this module.

use js_sys::{Array, Function, JSON, Promise, Reflect};
use prokode_auth::{
    Claims, Identity, PortalError, PortalResult, WidgetConfig, WidgetFailure, WidgetOutcome,
};
use serde_json::json;
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::dom_ids::SIGNIN_CONTAINER;
use crate::logic::{failure_from_parts, merge_userinfo, widget_options};

/// Global constructor exposed by the widget script.
const WIDGET_GLOBAL: &str = "OktaSignIn";

/// A constructed widget instance.
pub(crate) struct SignInWidget {
    widget: JsValue,
    scopes: Vec<String>,
    _after_error: Closure<dyn FnMut(JsValue, JsValue)>,
}

impl SignInWidget {
    /// Construct the widget. `on_error` receives credential failures the
    /// widget reports while its form stays open.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::WidgetConstruction`] when the script is missing
    /// or the constructor throws.
    pub(crate) fn construct(
        config: &WidgetConfig,
        on_error: impl Fn(WidgetFailure) + 'static,
    ) -> PortalResult<Self> {
        let constructor = lookup(&JsValue::from(js_sys::global()), WIDGET_GLOBAL)
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| PortalError::WidgetConstruction {
                detail: format!("{WIDGET_GLOBAL} is not loaded"),
            })?;
        let options = to_js(&widget_options(config))
            .map_err(|detail| PortalError::WidgetConstruction { detail })?;
        let widget = Reflect::construct(&constructor, &Array::of1(&options)).map_err(|err| {
            PortalError::WidgetConstruction {
                detail: describe(&err),
            }
        })?;

        let after_error = Closure::<dyn FnMut(JsValue, JsValue)>::new(
            move |_context: JsValue, error: JsValue| on_error(failure_from_js(&error)),
        );
        call(
            &widget,
            "on",
            &[JsValue::from_str("afterError"), after_error.as_ref().clone()],
        )?;
        debug!("sign-in widget constructed");

        Ok(Self {
            widget,
            scopes: config.scopes.clone(),
            _after_error: after_error,
        })
    }

    /// Resolve an identity from tokens already in the widget's storage.
    pub(crate) async fn restore(&self) -> WidgetOutcome {
        let manager = self.token_manager()?;
        let Some(id_token) = current_id_token(&manager).await? else {
            return Ok(None);
        };
        Ok(Some(identity_from_token(&id_token).map_err(failure_from_error)?))
    }

    /// Re-validate the stored token against the identity provider.
    pub(crate) async fn revalidate(&self) -> WidgetOutcome {
        let manager = self.token_manager()?;
        let Some(id_token) = current_id_token(&manager).await? else {
            return Ok(None);
        };
        let token_claims = claims_from_token(&id_token).map_err(failure_from_error)?;
        let auth_client = self.auth_client()?;
        let user = settle(call(&auth_client, "getUser", &[])).await?;
        let userinfo = claims_from_object(&user).map_err(failure_from_error)?;
        Ok(Some(Identity::from(merge_userinfo(token_claims, userinfo))))
    }

    /// Render the credential form and wait for tokens.
    pub(crate) async fn sign_in(&self) -> Result<Identity, WidgetFailure> {
        self.remove();
        let options = to_js(&json!({
            "el": format!("#{SIGNIN_CONTAINER}"),
            "scopes": self.scopes,
        }))
        .map_err(WidgetFailure::new)?;
        let tokens = settle(call(&self.widget, "showSignInToGetTokens", &[options])).await?;
        let manager = self.token_manager()?;
        call(&manager, "setTokens", &[tokens.clone()]).map_err(failure_from_error)?;
        self.remove();
        let id_token = lookup(&tokens, "idToken")
            .ok_or_else(|| WidgetFailure::new("sign-in returned no ID token"))?;
        identity_from_token(&id_token).map_err(failure_from_error)
    }

    /// Drop tokens from the widget's storage.
    pub(crate) fn clear_tokens(&self) {
        let cleared = self
            .token_manager()
            .and_then(|manager| call(&manager, "clear", &[]).map_err(failure_from_error));
        if let Err(failure) = cleared {
            warn!(detail = %failure.detail, "failed to clear widget tokens");
        }
    }

    /// Remove the rendered form, if any.
    pub(crate) fn remove(&self) {
        if let Err(err) = call(&self.widget, "remove", &[]) {
            debug!(error = %err, "widget remove failed");
        }
    }

    fn auth_client(&self) -> Result<JsValue, WidgetFailure> {
        lookup(&self.widget, "authClient")
            .ok_or_else(|| WidgetFailure::new("widget has no auth client"))
    }

    fn token_manager(&self) -> Result<JsValue, WidgetFailure> {
        lookup(&self.auth_client()?, "tokenManager")
            .ok_or_else(|| WidgetFailure::new("auth client has no token manager"))
    }
}

async fn current_id_token(manager: &JsValue) -> Result<Option<JsValue>, WidgetFailure> {
    let tokens = settle(call(manager, "getTokens", &[])).await?;
    let Some(id_token) = lookup(&tokens, "idToken") else {
        return Ok(None);
    };
    let expired = call(manager, "hasExpired", &[id_token.clone()])
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false);
    Ok((!expired).then_some(id_token))
}

fn identity_from_token(id_token: &JsValue) -> PortalResult<Identity> {
    claims_from_token(id_token).map(Identity::from)
}

fn claims_from_token(id_token: &JsValue) -> PortalResult<Claims> {
    if let Some(claims) = lookup(id_token, "claims") {
        return claims_from_object(&claims);
    }
    match lookup(id_token, "idToken").and_then(|raw| raw.as_string()) {
        Some(raw) => Claims::from_id_token(&raw),
        None => Err(PortalError::ClaimsDecode {
            detail: "token carries neither claims nor a raw ID token".to_string(),
        }),
    }
}

fn claims_from_object(value: &JsValue) -> PortalResult<Claims> {
    let raw = JSON::stringify(value).map_err(|err| PortalError::ClaimsDecode {
        detail: describe(&err),
    })?;
    Claims::from_json(&String::from(raw))
}

/// Await `result` when it holds a promise.
async fn settle(result: PortalResult<JsValue>) -> Result<JsValue, WidgetFailure> {
    let value = result.map_err(failure_from_error)?;
    match value.dyn_into::<Promise>() {
        Ok(promise) => JsFuture::from(promise)
            .await
            .map_err(|err| failure_from_js(&err)),
        Err(value) => Ok(value),
    }
}

fn call(target: &JsValue, method: &'static str, args: &[JsValue]) -> PortalResult<JsValue> {
    let function = lookup(target, method)
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| PortalError::Widget {
            operation: method,
            detail: "method missing".to_string(),
        })?;
    let args: Array = args.iter().collect();
    Reflect::apply(&function, target, &args).map_err(|err| PortalError::Widget {
        operation: method,
        detail: describe(&err),
    })
}

fn lookup(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn to_js(value: &serde_json::Value) -> Result<JsValue, String> {
    JSON::parse(&value.to_string()).map_err(|err| describe(&err))
}

fn failure_from_js(error: &JsValue) -> WidgetFailure {
    let code = lookup(error, "errorCode")
        .or_else(|| {
            lookup(error, "xhr")
                .and_then(|xhr| lookup(&xhr, "responseJSON"))
                .and_then(|body| lookup(&body, "errorCode"))
        })
        .or_else(|| lookup(error, "name"))
        .and_then(|value| value.as_string());
    let message = lookup(error, "errorSummary")
        .or_else(|| lookup(error, "message"))
        .and_then(|value| value.as_string())
        .or_else(|| error.as_string());
    failure_from_parts(code, message)
}

fn failure_from_error(err: PortalError) -> WidgetFailure {
    match err {
        PortalError::Widget { operation, detail } => {
            WidgetFailure::new(format!("{operation}: {detail}"))
        }
        PortalError::ClaimsDecode { detail } => WidgetFailure::new(format!("claims: {detail}")),
        other => WidgetFailure::new(other.to_string()),
    }
}

fn describe(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| lookup(err, "message").and_then(|message| message.as_string()))
        .unwrap_or_else(|| format!("{err:?}"))
}
