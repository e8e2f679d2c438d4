//! Connect message codecs: proto3 JSON and binary protobuf.

use http::HeaderValue;
use prost::Message;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use calculator_sdk::{CalculateRequest, CalculateResponse};

use super::error::ConnectError;

/// Message codec negotiated from the request `Content-Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Json,
    Proto,
}

/// Value of the `Accept-Post` header sent with 415 responses.
pub const SUPPORTED_CONTENT_TYPES: &str = "application/json, application/proto";

impl Codec {
    /// Pick the codec for a `Content-Type` value, ignoring parameters.
    #[must_use]
    pub fn from_content_type(value: Option<&HeaderValue>) -> Option<Self> {
        let raw = value?.to_str().ok()?;
        let essence = raw.split(';').next().unwrap_or(raw).trim();
        if essence.eq_ignore_ascii_case("application/json") {
            Some(Self::Json)
        } else if essence.eq_ignore_ascii_case("application/proto") {
            Some(Self::Proto)
        } else {
            None
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Proto => "application/proto",
        }
    }

    /// # Errors
    /// Returns `invalid_argument` if the body cannot be decoded.
    pub fn decode_request(self, body: &[u8]) -> Result<CalculateRequest, ConnectError> {
        match self {
            Self::Json => serde_json::from_slice::<CalculateRequestJson>(body)
                .map(Into::into)
                .map_err(|e| {
                    ConnectError::invalid_argument(format!("malformed JSON request: {e}"))
                }),
            Self::Proto => CalculateRequest::decode(body).map_err(|e| {
                ConnectError::invalid_argument(format!("malformed protobuf request: {e}"))
            }),
        }
    }

    /// # Errors
    /// Returns `internal` if the response cannot be encoded.
    pub fn encode_response(self, response: &CalculateResponse) -> Result<Vec<u8>, ConnectError> {
        match self {
            Self::Json => serde_json::to_vec(&CalculateResponseJson::from(response))
                .map_err(|e| ConnectError::internal(format!("failed to encode response: {e}"))),
            Self::Proto => Ok(response.encode_to_vec()),
        }
    }
}

/// proto3 JSON form of `CalculateRequest`; absent fields take proto3 defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CalculateRequestJson {
    #[serde(deserialize_with = "deserialize_double")]
    pub operand1: f64,
    #[serde(deserialize_with = "deserialize_double")]
    pub operand2: f64,
    #[serde(deserialize_with = "deserialize_string")]
    pub operator: String,
}

impl From<CalculateRequestJson> for CalculateRequest {
    fn from(json: CalculateRequestJson) -> Self {
        Self {
            operand1: json.operand1,
            operand2: json.operand2,
            operator: json.operator,
        }
    }
}

/// proto3 JSON form of `CalculateResponse`.
#[derive(Debug, Serialize)]
pub struct CalculateResponseJson {
    #[serde(serialize_with = "serialize_double")]
    pub result: f64,
}

impl From<&CalculateResponse> for CalculateResponseJson {
    fn from(response: &CalculateResponse) -> Self {
        Self {
            result: response.result,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDouble {
    Number(f64),
    Text(String),
}

fn parse_double_text(s: &str) -> Result<f64, String> {
    match s {
        "NaN" => Ok(f64::NAN),
        "Infinity" => Ok(f64::INFINITY),
        "-Infinity" => Ok(f64::NEG_INFINITY),
        other => match other.parse::<f64>() {
            // Rejects "inf"/"nan" spellings and out-of-range literals.
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!("invalid double value: {other:?}")),
        },
    }
}

// Numbers, numeric strings and the three special strings; `null` is 0.
fn deserialize_double<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonDouble>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(JsonDouble::Number(v)) => Ok(v),
        Some(JsonDouble::Text(s)) => parse_double_text(&s).map_err(de::Error::custom),
    }
}

fn deserialize_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_double<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_infinite() {
        serializer.serialize_str(if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    } else {
        serializer.serialize_f64(*value)
    }
}
