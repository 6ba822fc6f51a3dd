//! dom_utils.rs – thin helper layer for repetitive DOM operations on the
//! profile page.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

/// Set the inline `display` style; a no-op for non-HTML elements.
pub fn set_display(el: &Element, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property("display", value);
    }
}

pub fn hide(el: &Element) {
    set_display(el, "none");
}

/// Show `el` with the given `display` when `visible`, hide it otherwise.
pub fn toggle(el: &Element, visible: bool, display: &str) {
    set_display(el, if visible { display } else { "none" });
}

/// Fetch an `<input>` by id, if present and of the right type.
pub fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
}

/// Every `<input>` matching `selector`.
pub fn inputs_matching(document: &Document, selector: &str) -> Vec<HtmlInputElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlInputElement>().ok())
        .collect()
}

pub fn is_file_input(input: &HtmlInputElement) -> bool {
    input.type_().eq_ignore_ascii_case("file")
}
