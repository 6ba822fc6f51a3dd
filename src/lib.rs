use wasm_bindgen::prelude::*;

pub mod macros;
pub mod components;
pub mod controller;
pub mod dom_utils;
pub mod error;
pub mod host;
pub mod image_loader;
pub mod messages;
pub mod models;
pub mod network;
pub mod object_url;
pub mod pages;
pub mod state;
pub mod storage;
pub mod update;

#[cfg(test)]
mod tests;

pub use controller::ProfileController;
pub use error::ProfileError;

// Main entry point for the WASM application
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Initialize better panic messages
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("should have a document on window"))?;

    pages::profile::mount_profile(&document)
}
