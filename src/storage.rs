//! Session-scoped storage: the bearer token written by the login page and the
//! last resolved profile image reference.

use web_sys::Storage;

use crate::error::{ProfileError, Result};

/// Written by the login page.
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const PROFILE_IMAGE_URL_KEY: &str = "profileImageUrl";

fn session_storage() -> Result<Storage> {
    let window = web_sys::window().ok_or_else(|| ProfileError::Js("no global window".into()))?;
    window
        .session_storage()?
        .ok_or_else(|| ProfileError::Js("sessionStorage unavailable".into()))
}

fn read(key: &str) -> Option<String> {
    session_storage()
        .ok()?
        .get_item(key)
        .ok()
        .flatten()
        .filter(|v| !v.is_empty())
}

pub fn auth_token() -> Option<String> {
    read(AUTH_TOKEN_KEY)
}

pub fn saved_image_url() -> Option<String> {
    read(PROFILE_IMAGE_URL_KEY)
}

pub fn save_image_url(url: &str) -> Result<()> {
    session_storage()?.set_item(PROFILE_IMAGE_URL_KEY, url)?;
    Ok(())
}
