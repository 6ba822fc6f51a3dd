// src/pages/profile.rs
//
// Profile page glue: looks up the static markup, implements `ProfileHost`
// on top of it and wires DOM events to the controller.

use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Blob, Document, Element, File, FileReader, HtmlImageElement, HtmlInputElement, Url};

use crate::components::modal;
use crate::controller::ProfileController;
use crate::dom_utils;
use crate::error::{ProfileError, Result};
use crate::host::{ImageHost, ProfileHost};
use crate::models::{ProfileRecord, SavePayload};
use crate::network::{ApiClient, ApiConfig};
use crate::object_url::ObjectUrlApi;
use crate::{debug_log, error_log, storage, warn_log};

/// Page the user is sent to when no session token is present.
pub const ENTRY_PAGE: &str = "index.html";

/// ID constants for the static page markup.
pub mod ids {
    pub const INPUT_SELECTOR: &str = ".profile-input";
    pub const EDIT_BUTTON: &str = "edit-btn";
    pub const SAVE_BUTTON: &str = "save-btn";
    pub const CANCEL_BUTTON: &str = "cancel-btn";
    pub const FILE_INPUT: &str = "profile_image";
    pub const FILE_LABEL_SELECTOR: &str = "label.custom-file-upload";
    pub const IMAGE: &str = "profileImage";
    pub const FALLBACK_ICON: &str = "profileIcon";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const CONFIRM_MODAL: &str = "confirmModal";
    pub const SUCCESS_MODAL: &str = "successModal";
    pub const CONFIRM_BUTTON: &str = "confirmChangesBtn";
    pub const DISMISS_BUTTON: &str = "cancelChangesBtn";
    pub const SUCCESS_OK_BUTTON: &str = "successOkBtn";
}

/// Handles to the page elements.  Every one of them is optional; missing
/// markup simply disables the matching behaviour.
#[derive(Debug, Clone)]
pub struct ProfilePage {
    document: Document,
    image: Option<HtmlImageElement>,
    fallback_icon: Option<Element>,
    display_name: Option<Element>,
    edit_button: Option<Element>,
    save_button: Option<Element>,
    cancel_button: Option<Element>,
    file_label: Option<Element>,
    file_input: Option<HtmlInputElement>,
    confirm_modal: Option<Element>,
    success_modal: Option<Element>,
    confirm_button: Option<Element>,
    dismiss_button: Option<Element>,
    success_ok_button: Option<Element>,
}

impl ProfilePage {
    pub fn from_document(document: &Document) -> Self {
        let by_id = |id: &str| document.get_element_by_id(id);
        Self {
            document: document.clone(),
            image: by_id(ids::IMAGE).and_then(|e| e.dyn_into().ok()),
            fallback_icon: by_id(ids::FALLBACK_ICON),
            display_name: by_id(ids::DISPLAY_NAME),
            edit_button: by_id(ids::EDIT_BUTTON),
            save_button: by_id(ids::SAVE_BUTTON),
            cancel_button: by_id(ids::CANCEL_BUTTON),
            file_label: document.query_selector(ids::FILE_LABEL_SELECTOR).ok().flatten(),
            file_input: dom_utils::input_by_id(document, ids::FILE_INPUT),
            confirm_modal: by_id(ids::CONFIRM_MODAL),
            success_modal: by_id(ids::SUCCESS_MODAL),
            confirm_button: by_id(ids::CONFIRM_BUTTON),
            dismiss_button: by_id(ids::DISMISS_BUTTON),
            success_ok_button: by_id(ids::SUCCESS_OK_BUTTON),
        }
    }

    pub fn profile_inputs(&self) -> Vec<HtmlInputElement> {
        dom_utils::inputs_matching(&self.document, ids::INPUT_SELECTOR)
    }

    pub fn set_edit_mode(&self, enabled: bool) {
        for input in self.profile_inputs() {
            input.set_disabled(!enabled);
        }
        if let Some(el) = &self.edit_button {
            dom_utils::toggle(el, !enabled, "inline-block");
        }
        if let Some(el) = &self.save_button {
            dom_utils::toggle(el, enabled, "inline-block");
        }
        if let Some(el) = &self.cancel_button {
            dom_utils::toggle(el, enabled, "inline-block");
        }
        if let Some(el) = &self.file_label {
            dom_utils::toggle(el, enabled, "inline-flex");
        }
    }

    pub fn show_image(&self, src: &str) {
        show_image_in(self.image.as_ref(), self.fallback_icon.as_ref(), src);
    }

    pub fn show_fallback_icon(&self) {
        show_fallback_in(self.image.as_ref(), self.fallback_icon.as_ref());
    }

    /// Swap in the fallback icon whenever the visible image fails to load.
    /// A successful public probe is followed by a second, unobserved load of
    /// the same URL on the visible element; this covers that load failing.
    pub fn fall_back_when_image_breaks(&self) {
        let Some(img) = &self.image else { return };
        let image = self.image.clone();
        let icon = self.fallback_icon.clone();
        let on_error = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            warn_log!("profile image failed to render, showing the icon");
            show_fallback_in(image.as_ref(), icon.as_ref());
        }) as Box<dyn FnMut(_)>);
        img.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    pub fn set_confirm_dialog(&self, open: bool) {
        modal::set_open(self.confirm_modal.as_ref(), open);
    }

    pub fn set_success_dialog(&self, open: bool) {
        modal::set_open(self.success_modal.as_ref(), open);
    }
}

fn show_fallback_in(image: Option<&HtmlImageElement>, icon: Option<&Element>) {
    if let Some(img) = image {
        dom_utils::hide(img);
    }
    if let Some(icon) = icon {
        dom_utils::set_display(icon, "block");
    }
}

fn show_image_in(image: Option<&HtmlImageElement>, icon: Option<&Element>, src: &str) {
    if let Some(img) = image {
        img.set_src(src);
        dom_utils::set_display(img, "block");
    }
    if let Some(icon) = icon {
        dom_utils::hide(icon);
    }
}

/// `ProfileHost` backed by the real page, `fetch` and timers.
pub struct BrowserHost {
    page: ProfilePage,
    api: ApiClient,
}

impl BrowserHost {
    pub fn new(page: ProfilePage, api: ApiClient) -> Self {
        Self { page, api }
    }
}

impl ObjectUrlApi for BrowserHost {
    type Blob = Blob;

    fn create_object_url(&self, blob: &Blob) -> Result<String> {
        Ok(Url::create_object_url_with_blob(blob)?)
    }

    fn revoke_object_url(&self, url: &str) -> Result<()> {
        Ok(Url::revoke_object_url(url)?)
    }
}

impl ImageHost for BrowserHost {
    async fn load_public(&self, url: &str) -> Result<()> {
        // Probe with a detached element so a stale attempt never touches the
        // visible image.  The visible element then reloads the same URL,
        // normally from cache; `fall_back_when_image_breaks` handles a miss.
        let probe = HtmlImageElement::new()?;
        let loaded = js_sys::Promise::new(&mut |resolve: js_sys::Function, reject: js_sys::Function| {
            probe.set_onload(Some(&resolve));
            probe.set_onerror(Some(&reject));
        });
        probe.set_src(url);

        let result = JsFuture::from(loaded).await;
        probe.set_onload(None);
        probe.set_onerror(None);
        result
            .map(|_| ())
            .map_err(|_| ProfileError::ImageLoad("public-load-failed".into()))
    }

    async fn fetch_authenticated(&self, url: &str) -> Result<Blob> {
        self.api.fetch_image(url).await
    }

    fn show_image(&self, src: &str) {
        self.page.show_image(src);
    }

    fn show_fallback_icon(&self) {
        self.page.show_fallback_icon();
    }

    async fn sleep(&self, ms: u32) {
        gloo_timers::future::TimeoutFuture::new(ms).await;
    }

    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

impl ProfileHost for BrowserHost {
    type File = File;

    async fn fetch_profile(&self) -> Result<ProfileRecord> {
        self.api.fetch_profile().await
    }

    async fn submit_profile(&self, payload: &SavePayload<File>) -> Result<()> {
        self.api.update_profile(payload).await
    }

    fn read_inputs(&self) -> Vec<(String, String)> {
        self.page
            .profile_inputs()
            .into_iter()
            .filter(|input| !dom_utils::is_file_input(input))
            .map(|input| (input.id(), input.value()))
            .collect()
    }

    fn write_input(&self, id: &str, value: &str) {
        match dom_utils::input_by_id(&self.page.document, id) {
            Some(input) if !dom_utils::is_file_input(&input) => input.set_value(value),
            _ => {}
        }
    }

    fn set_edit_mode(&self, enabled: bool) {
        self.page.set_edit_mode(enabled);
    }

    fn set_display_name(&self, name: &str) {
        if let Some(el) = &self.page.display_name {
            el.set_text_content(Some(name));
        }
    }

    fn set_confirm_dialog(&self, open: bool) {
        self.page.set_confirm_dialog(open);
    }

    fn set_success_dialog(&self, open: bool) {
        self.page.set_success_dialog(open);
    }

    fn clear_file_chooser(&self) {
        if let Some(input) = &self.page.file_input {
            input.set_value("");
        }
    }

    fn preview_file(&self, file: &File) {
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(e) => {
                error_log!("FileReader unavailable: {:?}", e);
                return;
            }
        };

        let image = self.page.image.clone();
        let icon = self.page.fallback_icon.clone();
        let source = reader.clone();
        let on_load = Closure::once_into_js(move || {
            match source.result().ok().and_then(|v| v.as_string()) {
                Some(data_url) => show_image_in(image.as_ref(), icon.as_ref(), &data_url),
                None => warn_log!("selected file could not be read as a data URL"),
            }
        });
        reader.set_onload(Some(on_load.unchecked_ref()));

        if let Err(e) = reader.read_as_data_url(file) {
            error_log!("reading selected file failed: {:?}", e);
        }
    }

    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn persist_image_url(&self, url: &str) {
        if let Err(e) = storage::save_image_url(url) {
            warn_log!("could not remember profile image url: {}", e);
        }
    }
}

pub type BrowserController = ProfileController<BrowserHost>;

/// Mount the profile page onto the static markup and start the first load.
///
/// Without a session token the user is redirected to [`ENTRY_PAGE`] and
/// nothing else happens.
pub fn mount_profile(document: &Document) -> std::result::Result<(), JsValue> {
    let Some(token) = storage::auth_token() else {
        debug_log!("no session token, redirecting to {}", ENTRY_PAGE);
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        window.location().set_href(ENTRY_PAGE)?;
        return Ok(());
    };

    let config = ApiConfig::new();
    let page = ProfilePage::from_document(document);
    page.set_confirm_dialog(false);
    page.set_success_dialog(false);
    page.set_edit_mode(false);
    page.fall_back_when_image_breaks();

    let host = BrowserHost::new(page.clone(), ApiClient::new(config.clone(), token));
    let controller = Rc::new(ProfileController::new(host, config, storage::saved_image_url()));

    on_click(page.edit_button.as_ref(), &controller, |c| async move { c.begin_edit().await })?;
    on_click(page.save_button.as_ref(), &controller, |c| async move { c.request_save().await })?;
    on_click(page.dismiss_button.as_ref(), &controller, |c| async move {
        c.dismiss_confirm().await
    })?;
    on_click(page.confirm_button.as_ref(), &controller, |c| async move {
        c.confirm_save().await
    })?;
    on_click(page.success_ok_button.as_ref(), &controller, |c| async move {
        c.acknowledge_success().await
    })?;
    on_click(page.cancel_button.as_ref(), &controller, |c| async move { c.cancel_edit().await })?;

    if let Some(input) = page.file_input.clone() {
        let controller = Rc::clone(&controller);
        let target = input.clone();
        let on_change = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(file) = target.files().and_then(|list| list.get(0)) else {
                return;
            };
            let controller = Rc::clone(&controller);
            spawn_local(async move { controller.select_image(file).await });
        }) as Box<dyn FnMut(_)>);
        input.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
        on_change.forget();
    }

    if let Some(window) = web_sys::window() {
        let controller = Rc::clone(&controller);
        let on_unload = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            controller.teardown();
        }) as Box<dyn FnMut(_)>);
        window.add_event_listener_with_callback("beforeunload", on_unload.as_ref().unchecked_ref())?;
        on_unload.forget();
    }

    spawn_local(async move { controller.load().await });
    Ok(())
}

fn on_click<F, Fut>(
    target: Option<&Element>,
    controller: &Rc<BrowserController>,
    action: F,
) -> std::result::Result<(), JsValue>
where
    F: Fn(Rc<BrowserController>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let Some(target) = target else {
        return Ok(());
    };
    let controller = Rc::clone(controller);
    let cb = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
        spawn_local(action(Rc::clone(&controller)));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}
