//! Resolves a profile image reference to something on screen.
//!
//! Every attempt cycle tries a cache-busted public load first and an
//! authenticated blob fetch second.  Failed cycles are retried with a
//! doubling delay until the budget runs out, after which the fallback icon
//! is shown.  Each call takes a generation token; once a newer call starts
//! (or the page shows something else) the older one stops writing.

use std::cell::{Cell, RefCell};

use crate::host::ImageHost;
use crate::object_url::{ObjectUrlApi, ObjectUrlManager};
use crate::{debug_log, warn_log};

/// Retry budget for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRetry {
    /// Extra cycles after the first one.
    pub retries: u32,
    /// Wait before the first retry; doubles after every retry.
    pub delay_ms: u32,
}

impl ImageRetry {
    pub const DEFAULT: ImageRetry = ImageRetry { retries: 2, delay_ms: 500 };
    /// Used right after the profile record arrives.
    pub const AFTER_LOAD: ImageRetry = ImageRetry { retries: 2, delay_ms: 400 };
    /// Used when a cancelled edit restores the server image.
    pub const AFTER_CANCEL: ImageRetry = ImageRetry { retries: 1, delay_ms: 300 };

    pub fn new(retries: u32, delay_ms: u32) -> Self {
        Self { retries, delay_ms }
    }

    /// Waits between cycles, in order.
    pub fn delays(&self) -> Vec<u32> {
        (0..self.retries)
            .map(|i| self.delay_ms.saturating_mul(2u32.saturating_pow(i)))
            .collect()
    }
}

impl Default for ImageRetry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// How a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Shown straight from the URL.
    Public,
    /// Shown from an authenticated blob.
    Authenticated,
    /// Every cycle failed; the fallback icon is showing.
    Fallback,
    /// A newer resolution or preview took over; nothing more was written.
    Superseded,
}

/// Append a `t=<ms>` query parameter so stale cached failures are skipped.
pub fn cache_busted(url: &str, stamp_ms: i64) -> String {
    let joiner = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, joiner, stamp_ms)
}

#[derive(Debug, Default)]
pub struct ImageSequencer {
    generation: Cell<u64>,
    handles: RefCell<ObjectUrlManager>,
}

impl ImageSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every in-flight resolution stale.
    pub fn invalidate(&self) -> u64 {
        let next = self.generation.get().wrapping_add(1);
        self.generation.set(next);
        next
    }

    fn is_current(&self, token: u64) -> bool {
        self.generation.get() == token
    }

    /// Drop the live object URL, if any.
    pub fn release<A: ObjectUrlApi + ?Sized>(&self, api: &A) {
        self.handles.borrow_mut().release_current(api);
    }

    pub fn live_handle(&self) -> Option<String> {
        self.handles.borrow().current().map(str::to_owned)
    }

    pub async fn resolve<H: ImageHost>(&self, host: &H, url: &str, retry: ImageRetry) -> ImageOutcome {
        let token = self.invalidate();
        self.release(host);

        let mut delays = retry.delays().into_iter();
        let mut cycle = 0u32;
        let last_error = loop {
            cycle += 1;

            let busted = cache_busted(url, host.now_ms());
            match host.load_public(&busted).await {
                Ok(()) => {
                    if !self.is_current(token) {
                        return ImageOutcome::Superseded;
                    }
                    host.show_image(&busted);
                    return ImageOutcome::Public;
                }
                Err(e) => debug_log!("public image load failed (cycle {}): {}", cycle, e),
            }
            if !self.is_current(token) {
                return ImageOutcome::Superseded;
            }

            let failure = match host.fetch_authenticated(url).await {
                Ok(blob) => {
                    if !self.is_current(token) {
                        return ImageOutcome::Superseded;
                    }
                    let acquired = self.handles.borrow_mut().acquire(host, &blob);
                    match acquired {
                        Ok(object_url) => {
                            host.show_image(&object_url);
                            return ImageOutcome::Authenticated;
                        }
                        Err(e) => e,
                    }
                }
                Err(e) => e,
            };
            debug_log!("authenticated image fetch failed (cycle {}): {}", cycle, failure);

            match delays.next() {
                Some(delay) => {
                    host.sleep(delay).await;
                    if !self.is_current(token) {
                        return ImageOutcome::Superseded;
                    }
                }
                None => break failure,
            }
        };

        host.show_fallback_icon();
        warn_log!(
            "profile image {} could not be loaded after {} attempt(s): {}",
            url,
            cycle,
            last_error
        );
        ImageOutcome::Fallback
    }
}
