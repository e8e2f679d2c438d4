use std::time::Duration;

use anyhow::bail;
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::config::CalculatorConfig;

fn is_wildcard(items: &[String]) -> bool {
    items.iter().any(|s| s == "*")
}

/// Build a CORS layer from config.
///
/// Returns `None` when CORS is disabled (`cors_enabled: false` or `cors: null`).
///
/// # Errors
///
/// Returns an error if `allow_credentials` is `true` while any list contains
/// `"*"`; browsers reject credentialed responses with wildcard headers.
pub fn build_cors_layer(cfg: &CalculatorConfig) -> anyhow::Result<Option<CorsLayer>> {
    let Some(cors_cfg) = cfg.cors_policy() else {
        return Ok(None);
    };
    let has_wildcard_origin = is_wildcard(&cors_cfg.allowed_origins);

    if cors_cfg.allow_credentials {
        for (field, items) in [
            ("allowed_origins", &cors_cfg.allowed_origins),
            ("allowed_methods", &cors_cfg.allowed_methods),
            ("allowed_headers", &cors_cfg.allowed_headers),
            ("exposed_headers", &cors_cfg.exposed_headers),
        ] {
            if is_wildcard(items) {
                bail!(
                    "CORS misconfiguration: {field}=['*'] cannot be combined with \
                     allow_credentials=true; list explicit values when using credentials"
                );
            }
        }
    }

    if has_wildcard_origin {
        warn!(
            "CORS is configured with allowed_origins=['*']. \
             Any website can make cross-origin calls to the calculator."
        );
    }

    let mut layer = CorsLayer::new();

    if has_wildcard_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_cfg
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        if !origins.is_empty() {
            layer = layer.allow_origin(origins);
        }
    }

    if is_wildcard(&cors_cfg.allowed_methods) {
        layer = layer.allow_methods(Any);
    } else {
        let methods: Vec<Method> = cors_cfg
            .allowed_methods
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if !methods.is_empty() {
            layer = layer.allow_methods(methods);
        }
    }

    if is_wildcard(&cors_cfg.allowed_headers) {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors_cfg
            .allowed_headers
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if !headers.is_empty() {
            layer = layer.allow_headers(headers);
        }
    }

    if is_wildcard(&cors_cfg.exposed_headers) {
        layer = layer.expose_headers(Any);
    } else {
        let headers: Vec<HeaderName> = cors_cfg
            .exposed_headers
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        if !headers.is_empty() {
            layer = layer.expose_headers(headers);
        }
    }

    if cors_cfg.allow_credentials {
        layer = layer.allow_credentials(true);
    }

    if cors_cfg.max_age_seconds > 0 {
        layer = layer.max_age(Duration::from_secs(cors_cfg.max_age_seconds));
    }

    Ok(Some(layer))
}
