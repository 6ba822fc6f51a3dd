use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, Headers, Request, RequestInit, RequestMode, Response};

use super::config::ApiConfig;
use crate::error::{ProfileError, Result};
use crate::models::{ProfileRecord, SavePayload, PROFILE_IMAGE_FIELD};

/// REST client for the `/api/auth/me/` endpoint and authenticated image
/// downloads.  Every request carries the session's bearer token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    token: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig, token: impl Into<String>) -> Self {
        Self {
            config,
            token: token.into(),
        }
    }

    /// `GET /api/auth/me/`.  Any non-2xx answer is reported as unauthorized.
    pub async fn fetch_profile(&self) -> Result<ProfileRecord> {
        let headers = self.auth_headers()?;
        headers.append("Content-Type", "application/json")?;

        let resp = self.send(&self.config.me_url(), "GET", headers, None).await?;
        if !resp.ok() {
            return Err(ProfileError::Unauthorized(resp.status()));
        }

        let json = JsFuture::from(resp.json()?).await?;
        let value: serde_json::Value = serde_wasm_bindgen::from_value(json)?;
        ProfileRecord::from_value(&value)
    }

    /// `PUT /api/auth/me/` as multipart form data.  The browser sets the
    /// multipart boundary, so no Content-Type header is added here.
    pub async fn update_profile(&self, payload: &SavePayload<File>) -> Result<()> {
        let form = FormData::new()?;
        for (field, value) in &payload.fields {
            form.append_with_str(field.key(), value)?;
        }
        if let Some(file) = &payload.image {
            form.append_with_blob_and_filename(PROFILE_IMAGE_FIELD, file, &file.name())?;
        }

        let resp = self
            .send(&self.config.me_url(), "PUT", self.auth_headers()?, Some(&form))
            .await?;
        if !resp.ok() {
            return Err(ProfileError::Save(resp.status()));
        }
        Ok(())
    }

    /// Download an image with the bearer credential.  `url` is used as-is.
    pub async fn fetch_image(&self, url: &str) -> Result<Blob> {
        let resp = self.send(url, "GET", self.auth_headers()?, None).await?;
        if !resp.ok() {
            return Err(ProfileError::ImageLoad(format!("HTTP {}", resp.status())));
        }
        let blob = JsFuture::from(resp.blob()?).await?;
        blob.dyn_into::<Blob>()
            .map_err(|_| ProfileError::ImageLoad("response body is not a blob".into()))
    }

    fn auth_headers(&self) -> Result<Headers> {
        let headers = Headers::new()?;
        headers.append("Authorization", &format!("Bearer {}", self.token))?;
        Ok(headers)
    }

    async fn send(
        &self,
        url: &str,
        method: &str,
        headers: Headers,
        body: Option<&FormData>,
    ) -> Result<Response> {
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);
        opts.set_headers(&headers);
        if let Some(form) = body {
            opts.set_body(form);
        }

        let request = Request::new_with_str_and_init(url, &opts)?;
        let window = web_sys::window().ok_or_else(|| ProfileError::Js("no global window".into()))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| ProfileError::Network(js_reason(&e)))?;
        Ok(resp_value.dyn_into()?)
    }
}

/// Fetch rejects with a `TypeError`; its message is more useful than the
/// `Debug` form of the whole value.
fn js_reason(value: &JsValue) -> String {
    value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.to_string()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}
