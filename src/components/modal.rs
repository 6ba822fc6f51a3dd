//! Shared modal helper for the confirm and success dialogs.
//!
//! The dialogs are part of the static page markup; this only toggles them.

use web_sys::Element;

use crate::dom_utils;

/// Dialog backdrops are flex containers that centre their content.
const OPEN_DISPLAY: &str = "flex";

pub fn show(modal_backdrop: &Element) {
    dom_utils::set_display(modal_backdrop, OPEN_DISPLAY);
}

pub fn hide(modal_backdrop: &Element) {
    dom_utils::hide(modal_backdrop);
}

pub fn set_open(modal_backdrop: Option<&Element>, open: bool) {
    if let Some(el) = modal_backdrop {
        if open {
            show(el);
        } else {
            hide(el);
        }
    }
}
