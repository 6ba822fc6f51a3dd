//! Lifecycle of the single blob-backed `<img>` source.
//!
//! At most one object URL is live at a time.  `acquire` always releases the
//! previous one first and `release_current` is safe to call repeatedly; a
//! URL is handed to `revoke_object_url` exactly once.

use crate::debug_log;
use crate::error::Result;

/// Creation and revocation of object URLs (`URL.createObjectURL` and
/// `URL.revokeObjectURL` in the browser).
pub trait ObjectUrlApi {
    type Blob;

    fn create_object_url(&self, blob: &Self::Blob) -> Result<String>;
    fn revoke_object_url(&self, url: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ObjectUrlManager {
    current: Option<String>,
}

impl ObjectUrlManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the live handle (if any) and create a new one for `blob`.
    pub fn acquire<A>(&mut self, api: &A, blob: &A::Blob) -> Result<String>
    where
        A: ObjectUrlApi + ?Sized,
    {
        self.release_current(api);
        let url = api.create_object_url(blob)?;
        self.current = Some(url.clone());
        Ok(url)
    }

    /// Revoke errors are swallowed: the handle is gone from our side either way.
    pub fn release_current<A>(&mut self, api: &A)
    where
        A: ObjectUrlApi + ?Sized,
    {
        if let Some(url) = self.current.take() {
            if let Err(e) = api.revoke_object_url(&url) {
                debug_log!("revoking {} failed: {}", url, e);
            }
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.current.is_some()
    }
}
