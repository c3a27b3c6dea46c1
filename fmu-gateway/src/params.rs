//! The `mass` / `stiffness` overrides carried by the `parameters` form field.

use anyhow::anyhow;
use serde_json::Value;

use crate::{
    config::{GatewayConfig, ParametersMode},
    error::ApiError,
};

const MASS: &str = "mass";
const STIFFNESS: &str = "stiffness";

/// Start value overrides requested by the client.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Overrides {
    pub mass: Option<f64>,
    pub stiffness: Option<f64>,
}

impl Overrides {
    /// Parse the raw `parameters` field. Keys other than `mass` and `stiffness` are ignored.
    pub fn parse(raw: Option<&str>, mode: ParametersMode) -> Result<Self, ApiError> {
        let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
            return Ok(Self::default());
        };

        let object = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                let msg = format!("expected a JSON object, got {}", json_kind(&other));
                return match mode {
                    ParametersMode::Strict => Err(ApiError::InvalidParameters(msg)),
                    ParametersMode::Lenient => {
                        log::warn!("Ignoring parameters: {msg}");
                        Ok(Self::default())
                    }
                };
            }
            Err(err) => {
                return match mode {
                    ParametersMode::Strict => Err(ApiError::InvalidParameters(err.to_string())),
                    ParametersMode::Lenient => {
                        log::warn!("Ignoring malformed parameters: {err}");
                        Ok(Self::default())
                    }
                };
            }
        };

        let coerce = |key: &str| -> Result<Option<f64>, ApiError> {
            let Some(value) = object.get(key) else {
                return Ok(None);
            };
            coerce_f64(value).map(Some).ok_or_else(|| {
                let msg = format!("'{key}' must be a number, got {value}");
                match mode {
                    ParametersMode::Strict => ApiError::InvalidParameters(msg),
                    ParametersMode::Lenient => ApiError::Internal(anyhow!(msg)),
                }
            })
        };

        let overrides = Self {
            mass: coerce(MASS)?,
            stiffness: coerce(STIFFNESS)?,
        };
        log::debug!("Parsed overrides {overrides:?}");
        Ok(overrides)
    }

    /// `name=value` start values for the configured model variables.
    pub fn start_values(&self, config: &GatewayConfig) -> Vec<String> {
        [
            (&config.mass_variable, self.mass),
            (&config.stiffness_variable, self.stiffness),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| format!("{name}={value}")))
        .collect()
    }
}

/// Numbers, and strings holding a number, are accepted.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn test_absent() {
        for mode in [ParametersMode::Strict, ParametersMode::Lenient] {
            assert_eq!(Overrides::parse(None, mode).unwrap(), Overrides::default());
            assert_eq!(
                Overrides::parse(Some("  "), mode).unwrap(),
                Overrides::default()
            );
        }
    }

    #[test]
    fn test_values() {
        let overrides = Overrides::parse(
            Some(r#"{"mass": 2.5, "stiffness": " 0.75 ", "damping": "x"}"#),
            ParametersMode::Strict,
        )
        .unwrap();
        assert_eq!(
            overrides,
            Overrides {
                mass: Some(2.5),
                stiffness: Some(0.75),
            }
        );

        let overrides = Overrides::parse(Some(r#"{"mass": 3}"#), ParametersMode::Strict).unwrap();
        assert_eq!(overrides.mass, Some(3.0));
        assert_eq!(overrides.stiffness, None);
    }

    #[test]
    fn test_malformed() {
        for raw in ["not json", "[1, 2]", "2.5"] {
            let err = Overrides::parse(Some(raw), ParametersMode::Strict).unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{raw}");

            assert_eq!(
                Overrides::parse(Some(raw), ParametersMode::Lenient).unwrap(),
                Overrides::default(),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_not_coercible() {
        let raw = Some(r#"{"mass": "heavy"}"#);
        let err = Overrides::parse(raw, ParametersMode::Strict).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = Overrides::parse(raw, ParametersMode::Lenient).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), r#"'mass' must be a number, got "heavy""#);

        let err = Overrides::parse(Some(r#"{"stiffness": null}"#), ParametersMode::Strict)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameters(_)));
    }

    #[test]
    fn test_start_values() {
        let config = GatewayConfig::default();
        assert!(Overrides::default().start_values(&config).is_empty());

        let overrides = Overrides {
            mass: Some(2.5),
            stiffness: Some(1.0),
        };
        assert_eq!(
            overrides.start_values(&config),
            ["body1.m=2.5", "body1.frame_a.r_0[2]=1"]
        );
    }
}
