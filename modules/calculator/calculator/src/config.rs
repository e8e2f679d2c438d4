//! Configuration for the calculator server.

use serde::{Deserialize, Deserializer, Serialize};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8088";

/// Calculator server configuration (the `modules.calculator` section).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Listen address shared by the gRPC and Connect bindings.
    pub bind_addr: String,

    /// Apply the cross-origin policy to the HTTP surface.
    pub cors_enabled: bool,

    /// Cross-origin policy. Absent uses [`CorsConfig::default`]; an explicit
    /// `null` (`Some(None)`) disables CORS.
    #[allow(clippy::option_option)]
    #[serde(
        deserialize_with = "deserialize_explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub cors: Option<Option<CorsConfig>>,
}

// Only called when the key is present, so `null` maps to `Some(None)`.
#[allow(clippy::option_option)]
fn deserialize_explicit_null<'de, D>(
    deserializer: D,
) -> Result<Option<Option<CorsConfig>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<CorsConfig>::deserialize(deserializer).map(Some)
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            cors_enabled: true,
            cors: None,
        }
    }
}

impl CalculatorConfig {
    /// Effective CORS policy, or `None` when CORS is switched off.
    #[must_use]
    pub fn cors_policy(&self) -> Option<CorsConfig> {
        if !self.cors_enabled {
            return None;
        }
        match &self.cors {
            None => Some(CorsConfig::default()),
            Some(explicit) => explicit.clone(),
        }
    }
}

/// Cross-origin resource sharing policy.
///
/// A `"*"` entry in any list means "any".
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub exposed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime; `0` omits `Access-Control-Max-Age`.
    pub max_age_seconds: u64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// Matches the browser client served from the local dev server.
impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: strings(&["http://localhost:3000"]),
            allowed_methods: strings(&["POST", "GET", "OPTIONS", "PUT", "DELETE"]),
            allowed_headers: strings(&[
                "Accept",
                "Content-Type",
                "Content-Length",
                "Accept-Encoding",
                "Authorization",
                "Connect-Protocol-Version",
                "Connect-Timeout-Ms",
                "X-Requested-With",
            ]),
            exposed_headers: strings(&["Connect-Protocol-Version"]),
            allow_credentials: true,
            max_age_seconds: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: CalculatorConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8088");
        assert!(cfg.cors_enabled);
        assert!(cfg.cors.is_none());
    }

    #[test]
    fn partial_cors_section_keeps_other_defaults() {
        let cfg: CalculatorConfig = serde_json::from_value(serde_json::json!({
            "bind_addr": "127.0.0.1:9000",
            "cors": { "allowed_origins": ["https://calc.example.com"] }
        }))
        .unwrap();

        let cors = cfg.cors_policy().unwrap();
        assert_eq!(cors.allowed_origins, vec!["https://calc.example.com"]);
        assert_eq!(cors.exposed_headers, vec!["Connect-Protocol-Version"]);
        assert!(cors.allow_credentials);
    }

    #[test]
    fn explicit_null_cors_disables_policy() {
        let cfg: CalculatorConfig =
            serde_json::from_value(serde_json::json!({ "cors": null })).unwrap();
        assert!(cfg.cors_enabled);
        assert_eq!(cfg.cors, Some(None));
        assert!(cfg.cors_policy().is_none());
    }

    #[test]
    fn explicit_null_cors_survives_reserialization() {
        let cfg: CalculatorConfig =
            serde_json::from_value(serde_json::json!({ "cors": null })).unwrap();
        let value = serde_json::to_value(&cfg).unwrap();
        assert!(value["cors"].is_null());

        let back: CalculatorConfig = serde_json::from_value(value).unwrap();
        assert!(back.cors_policy().is_none());
    }

    #[test]
    fn cors_enabled_false_wins_over_explicit_policy() {
        let cfg = CalculatorConfig {
            cors_enabled: false,
            cors: Some(Some(CorsConfig::default())),
            ..CalculatorConfig::default()
        };
        assert!(cfg.cors_policy().is_none());
    }

    #[test]
    fn absent_cors_uses_default_policy() {
        assert_eq!(
            CalculatorConfig::default().cors_policy(),
            Some(CorsConfig::default())
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<CalculatorConfig, _> =
            serde_json::from_value(serde_json::json!({ "bind_adr": "127.0.0.1:9000" }));
        assert!(result.is_err());
    }
}
