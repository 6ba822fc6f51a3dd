//! End-to-end flows through the controller against the in-memory page.

use std::cell::Cell;
use std::rc::Rc;

use futures::executor::block_on;
use futures::FutureExt;

use super::fake_host::{Event, FakeHost};
use crate::controller::ProfileController;
use crate::error::ProfileError;
use crate::image_loader::cache_busted;
use crate::models::{ProfileField, ProfileRecord, SavePayload};
use crate::network::ApiConfig;
use crate::state::EditMode;

const ORIGIN: &str = "https://x.test";

fn controller(host: FakeHost) -> ProfileController<FakeHost> {
    ProfileController::new(host, ApiConfig::from_url(ORIGIN), None)
}

fn ana() -> ProfileRecord {
    ProfileRecord::from_json(
        r#"{"first_name":"Ana","last_name":"Diaz","phone":"555","profile_image":"/media/a.png"}"#,
    )
    .unwrap()
}

#[test]
fn initial_load_fills_inputs_and_resolves_relative_image() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_public([true]);
    let ctrl = controller(host);

    block_on(ctrl.load());

    let host = ctrl.host();
    let url = format!("{}/media/a.png", ORIGIN);
    assert!(host.events().contains(&Event::DisplayName("Ana".into())));
    assert!(host.events().contains(&Event::PersistImageUrl(url.clone())));
    assert!(host
        .events()
        .contains(&Event::ShowImage(cache_busted(&url, FakeHost::NOW_MS))));
    assert_eq!(host.input("first_name").as_deref(), Some("Ana"));
    assert_eq!(host.input("last_name").as_deref(), Some("Diaz"));
    assert_eq!(host.input("nickname").as_deref(), Some(""));
    // View mode is applied before the image sequence starts.
    let view = host.position(&Event::EditMode(false)).unwrap();
    let public = host.events().iter().position(|e| matches!(e, Event::Public(_))).unwrap();
    assert!(view < public);
    assert_eq!(ctrl.state().persisted_image_url.as_deref(), Some(url.as_str()));
    assert_eq!(ctrl.mode(), EditMode::Viewing);
}

#[test]
fn failed_load_alerts_without_touching_the_page() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Err(ProfileError::Unauthorized(401)));
    let ctrl = controller(host);

    block_on(ctrl.load());

    assert_eq!(
        ctrl.host().events(),
        vec![
            Event::FetchProfile,
            Event::Alert("Could not load profile data: unauthorized (HTTP 401)".into()),
        ]
    );
}

#[test]
fn record_without_image_shows_icon_directly() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ProfileRecord::default().with_field(ProfileField::FirstName, "Ana")));
    let ctrl = controller(host);

    block_on(ctrl.load());

    assert!(ctrl.host().events().contains(&Event::Fallback));
    assert_eq!(ctrl.host().cycles(), 0);
}

#[test]
fn selecting_a_file_previews_locally_without_network() {
    let host = FakeHost::with_profile_inputs();
    let ctrl = controller(host);
    block_on(ctrl.begin_edit());
    ctrl.host().clear_events();

    block_on(ctrl.select_image("me.png".to_string()));

    assert_eq!(ctrl.host().events(), vec![Event::Preview("me.png".into())]);
    assert_eq!(ctrl.host().network_calls(), 0);
    assert_eq!(ctrl.state().pending_image.as_deref(), Some("me.png"));
}

#[test]
fn selecting_a_file_releases_the_live_blob() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_auth([true]);
    let ctrl = controller(host);
    block_on(ctrl.load());
    assert_eq!(ctrl.images().live_handle().as_deref(), Some("blob:1"));

    block_on(ctrl.begin_edit());
    block_on(ctrl.select_image("me.png".to_string()));

    assert_eq!(ctrl.host().revoked(), vec!["blob:1".to_string()]);
    assert_eq!(ctrl.images().live_handle(), None);
}

#[test]
fn successful_save_reloads_then_opens_success_dialog() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_public([true, true]);
    let ctrl = controller(host);
    block_on(ctrl.load());

    block_on(ctrl.begin_edit());
    ctrl.host().type_into("first_name", "Ana Maria");
    block_on(ctrl.select_image("me.png".to_string()));
    block_on(ctrl.request_save());
    assert_eq!(ctrl.mode(), EditMode::ConfirmPending);

    ctrl.host().clear_events();
    ctrl.host().respond_profile(Ok(ana().with_field(ProfileField::FirstName, "Ana Maria")));
    block_on(ctrl.confirm_save());

    let host = ctrl.host();
    let submitted = SavePayload {
        fields: vec![
            (ProfileField::FirstName, "Ana Maria".to_string()),
            (ProfileField::LastName, "Diaz".to_string()),
            (ProfileField::Birthday, String::new()),
            (ProfileField::Phone, "555".to_string()),
            (ProfileField::Country, String::new()),
        ],
        image: Some("me.png".to_string()),
    };
    assert_eq!(host.events()[0], Event::Submit(submitted));

    let clear = host.position(&Event::ClearFileChooser).unwrap();
    let close = host.position(&Event::ConfirmDialog(false)).unwrap();
    let reload = host.position(&Event::FetchProfile).unwrap();
    let image = host
        .events()
        .iter()
        .position(|e| matches!(e, Event::ShowImage(_)))
        .unwrap();
    let success = host.position(&Event::SuccessDialog(true)).unwrap();
    assert!(clear < close && close < reload && reload < image && image < success);

    assert_eq!(ctrl.state().pending_image, None);
    assert_eq!(ctrl.mode(), EditMode::Viewing);

    block_on(ctrl.acknowledge_success());
    assert!(!ctrl.host().inputs_enabled());
    assert_eq!(ctrl.mode(), EditMode::Viewing);
}

#[test]
fn failed_save_keeps_edits_live() {
    let host = FakeHost::with_profile_inputs();
    host.respond_save(Err(ProfileError::Save(500)));
    let ctrl = controller(host);

    block_on(ctrl.begin_edit());
    ctrl.host().type_into("phone", "999");
    block_on(ctrl.request_save());
    block_on(ctrl.confirm_save());

    let events = ctrl.host().events();
    assert!(events.contains(&Event::Alert("Could not save changes: HTTP 500".into())));
    assert_eq!(events.last(), Some(&Event::ConfirmDialog(false)));
    assert!(!events.contains(&Event::FetchProfile));
    assert_eq!(ctrl.mode(), EditMode::Editing);
    assert!(ctrl.host().inputs_enabled());
    assert_eq!(ctrl.host().input("phone").as_deref(), Some("999"));
}

#[test]
fn cancel_edit_restores_inputs_and_server_image() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_public([true, false]);
    host.script_auth([false, true]);
    let ctrl = controller(host);
    block_on(ctrl.load());
    let before = ctrl.host().inputs();

    block_on(ctrl.begin_edit());
    ctrl.host().type_into("first_name", "Zed");
    ctrl.host().type_into("nickname", "zz");
    block_on(ctrl.select_image("me.png".to_string()));
    ctrl.host().clear_events();

    block_on(ctrl.cancel_edit());

    let host = ctrl.host();
    assert_eq!(host.inputs(), before);
    assert!(!host.inputs_enabled());
    assert!(host.events().contains(&Event::ClearFileChooser));
    // One retry (AFTER_CANCEL): public and auth fail once, then auth succeeds.
    assert_eq!(host.sleeps(), vec![300]);
    assert_eq!(host.events().last(), Some(&Event::ShowImage("blob:1".into())));
    assert_eq!(ctrl.state().pending_image, None);
    assert_eq!(ctrl.mode(), EditMode::Viewing);
}

#[test]
fn cancel_edit_without_known_server_image_shows_icon() {
    let host = FakeHost::with_profile_inputs();
    let ctrl = controller(host);

    block_on(ctrl.begin_edit());
    block_on(ctrl.select_image("me.png".to_string()));
    block_on(ctrl.cancel_edit());

    assert!(ctrl.host().events().contains(&Event::Fallback));
    assert_eq!(ctrl.host().network_calls(), 0);
}

#[test]
fn dismissing_confirm_returns_to_editing() {
    let host = FakeHost::with_profile_inputs();
    let ctrl = controller(host);

    block_on(ctrl.begin_edit());
    block_on(ctrl.request_save());
    block_on(ctrl.dismiss_confirm());

    assert_eq!(ctrl.mode(), EditMode::Editing);
    assert!(ctrl.host().inputs_enabled());
    assert_eq!(ctrl.host().network_calls(), 0);
}

#[test]
fn edit_clicked_while_image_retries_stays_editable() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    let ctrl = Rc::new(controller(host));

    // Click Edit during the first backoff of the initial image resolution.
    let weak = Rc::downgrade(&ctrl);
    let clicked = Cell::new(false);
    ctrl.host().on_sleep(move || {
        if clicked.replace(true) {
            return;
        }
        if let Some(ctrl) = weak.upgrade() {
            ctrl.begin_edit().now_or_never().expect("edit click completes synchronously");
        }
    });

    block_on(ctrl.load());

    assert_eq!(ctrl.host().sleeps(), vec![400, 800]);
    assert_eq!(ctrl.host().events().last(), Some(&Event::Fallback));
    assert_eq!(ctrl.mode(), EditMode::Editing);
    assert!(ctrl.host().inputs_enabled());

    block_on(ctrl.cancel_edit());
    assert_eq!(ctrl.mode(), EditMode::Viewing);
    assert_eq!(ctrl.host().input("first_name").as_deref(), Some("Ana"));

    block_on(ctrl.begin_edit());
    assert_eq!(ctrl.mode(), EditMode::Editing);
    assert!(ctrl.host().inputs_enabled());
}

#[test]
fn load_landing_under_confirm_dialog_keeps_it_working() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_public([true]);
    let ctrl = controller(host);

    block_on(ctrl.begin_edit());
    block_on(ctrl.request_save());
    block_on(ctrl.load());
    assert_eq!(ctrl.mode(), EditMode::ConfirmPending);
    assert!(ctrl.host().inputs_enabled());

    ctrl.host().clear_events();
    block_on(ctrl.dismiss_confirm());
    assert_eq!(ctrl.host().events(), vec![Event::ConfirmDialog(false)]);
    assert_eq!(ctrl.mode(), EditMode::Editing);

    block_on(ctrl.request_save());
    block_on(ctrl.confirm_save());
    assert!(ctrl.host().events().iter().any(|e| matches!(e, Event::Submit(_))));
}

#[test]
fn save_that_never_reaches_the_server_uses_the_save_wording() {
    let host = FakeHost::with_profile_inputs();
    host.respond_save(Err(ProfileError::Network("TypeError: Failed to fetch".into())));
    let ctrl = controller(host);

    block_on(ctrl.begin_edit());
    block_on(ctrl.request_save());
    block_on(ctrl.confirm_save());

    let alerts: Vec<_> = ctrl
        .host()
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::Alert(_)))
        .collect();
    assert_eq!(
        alerts,
        vec![Event::Alert(
            "Could not save changes: network error: TypeError: Failed to fetch".into()
        )]
    );
    assert_eq!(ctrl.mode(), EditMode::Editing);
}

#[test]
fn teardown_releases_live_blob_once() {
    let host = FakeHost::with_profile_inputs();
    host.respond_profile(Ok(ana()));
    host.script_auth([true]);
    let ctrl = controller(host);
    block_on(ctrl.load());

    ctrl.teardown();
    ctrl.teardown();

    assert_eq!(ctrl.host().revoked(), vec!["blob:1".to_string()]);
}
