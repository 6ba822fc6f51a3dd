//! Small crate-wide logging macros.
//!
//! On `wasm32` everything goes to the browser console.  Native builds (unit
//! tests for the reducer and the image sequencer) print to stderr instead,
//! because calling a `web_sys::console` import outside the browser aborts.

/// Debug-level trace.  Compiled out of release builds.
///
/// ```rust,ignore
/// debug_log!("profile mode is now {:?}", mode);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::macros::emit($crate::macros::Level::Debug, &format!($($arg)*));
        }
    };
}

/// Non-fatal diagnostic, e.g. an image that could not be resolved.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        $crate::macros::emit($crate::macros::Level::Warn, &format!($($arg)*))
    };
}

/// Failure that the user may also see as an alert.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::macros::emit($crate::macros::Level::Error, &format!($($arg)*))
    };
}

#[doc(hidden)]
#[derive(Debug, Clone, Copy)]
pub enum Level {
    Debug,
    Warn,
    Error,
}

#[doc(hidden)]
#[cfg(target_arch = "wasm32")]
pub fn emit(level: Level, message: &str) {
    let value = wasm_bindgen::JsValue::from_str(message);
    match level {
        Level::Debug => web_sys::console::log_1(&value),
        Level::Warn => web_sys::console::warn_1(&value),
        Level::Error => web_sys::console::error_1(&value),
    }
}

#[doc(hidden)]
#[cfg(not(target_arch = "wasm32"))]
pub fn emit(level: Level, message: &str) {
    eprintln!("[{:?}] {}", level, message);
}
