//! Error type shared by the loader, the save path and the image sequencer.

use wasm_bindgen::JsValue;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    /// Profile fetch answered with a non-2xx status.
    #[error("unauthorized (HTTP {0})")]
    Unauthorized(u16),
    /// The request never got a response (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),
    /// Update request answered with a non-2xx status.
    #[error("HTTP {0}")]
    Save(u16),
    #[error("image could not be loaded: {0}")]
    ImageLoad(String),
    #[error("malformed profile data: {0}")]
    Decode(String),
    #[error("browser call failed: {0}")]
    Js(String),
}

impl From<JsValue> for ProfileError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        Self::Js(text)
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for ProfileError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

impl From<ProfileError> for JsValue {
    fn from(e: ProfileError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_render_the_code() {
        assert_eq!(ProfileError::Unauthorized(401).to_string(), "unauthorized (HTTP 401)");
        assert_eq!(ProfileError::Save(500).to_string(), "HTTP 500");
    }

    #[test]
    fn json_errors_become_decode_errors() {
        let err: ProfileError = serde_json::from_str::<serde_json::Value>("{nope")
            .unwrap_err()
            .into();
        assert!(matches!(err, ProfileError::Decode(_)));
    }
}
