//! Seams between the profile page logic and the outside world.
//!
//! The browser implementation lives in [`crate::pages::profile`]; unit tests
//! drive the same controller through an in-memory fake.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::models::{ProfileRecord, SavePayload};
use crate::object_url::ObjectUrlApi;

/// What the image sequencer needs: two ways of fetching, somewhere to show
/// the result, and a timer.
pub trait ImageHost: ObjectUrlApi {
    /// Load `url` as a plain public image.  Resolves once the load signal
    /// fires, fails on the error signal.  Must not touch the visible image.
    async fn load_public(&self, url: &str) -> Result<()>;

    /// Fetch `url` with the bearer credential.  Non-2xx is an error.
    async fn fetch_authenticated(&self, url: &str) -> Result<Self::Blob>;

    /// Show `src` in the profile image and hide the fallback icon.
    fn show_image(&self, src: &str);

    /// Hide the profile image and show the fallback icon.
    fn show_fallback_icon(&self);

    async fn sleep(&self, ms: u32);

    /// Milliseconds since the epoch, used for cache busting.
    fn now_ms(&self) -> i64;
}

/// Full page boundary used by [`crate::controller::ProfileController`].
pub trait ProfileHost: ImageHost {
    /// A locally chosen image file.
    type File: Clone;

    async fn fetch_profile(&self) -> Result<ProfileRecord>;
    async fn submit_profile(&self, payload: &SavePayload<Self::File>) -> Result<()>;

    /// `(id, value)` of every editable text input on the page.
    fn read_inputs(&self) -> Vec<(String, String)>;
    /// Set the input with `id`, if the page has one.
    fn write_input(&self, id: &str, value: &str);
    fn set_edit_mode(&self, enabled: bool);
    fn set_display_name(&self, name: &str);
    fn set_confirm_dialog(&self, open: bool);
    fn set_success_dialog(&self, open: bool);
    fn clear_file_chooser(&self);
    /// Show `file` as a local preview without going to the network.
    fn preview_file(&self, file: &Self::File);
    /// Blocking, user-visible notification.
    fn alert(&self, message: &str);
    /// Remember the resolved image reference for the rest of the session.
    fn persist_image_url(&self, url: &str);
}
