//! Runs the profile page: feeds messages through [`crate::update::update`]
//! and executes the resulting commands against a [`ProfileHost`].
//!
//! Commands run strictly in order.  Asynchronous ones (profile load, save,
//! image resolution) are awaited before the next command starts, and the
//! follow-up commands produced by their result messages run before the rest
//! of the queue.

use std::cell::{Ref, RefCell};
use std::collections::VecDeque;

use crate::{debug_log, error_log};
use crate::host::ProfileHost;
use crate::image_loader::ImageSequencer;
use crate::messages::{Command, Message};
use crate::network::ApiConfig;
use crate::state::{EditMode, ProfileState};
use crate::update::update;

pub struct ProfileController<H: ProfileHost> {
    host: H,
    state: RefCell<ProfileState<H::File>>,
    images: ImageSequencer,
}

impl<H: ProfileHost> ProfileController<H> {
    pub fn new(host: H, api: ApiConfig, persisted_image_url: Option<String>) -> Self {
        Self {
            host,
            state: RefCell::new(ProfileState::new(api, persisted_image_url)),
            images: ImageSequencer::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> Ref<'_, ProfileState<H::File>> {
        self.state.borrow()
    }

    pub fn mode(&self) -> EditMode {
        self.state.borrow().mode
    }

    pub fn images(&self) -> &ImageSequencer {
        &self.images
    }

    /// Apply `msg` to the state.  The borrow ends before any command runs.
    pub fn dispatch(&self, msg: Message<H::File>) -> Vec<Command<H::File>> {
        let mut state = self.state.borrow_mut();
        update(&mut state, msg)
    }

    pub async fn handle(&self, msg: Message<H::File>) {
        let commands = self.dispatch(msg);
        self.run(commands).await;
    }

    pub async fn run(&self, commands: Vec<Command<H::File>>) {
        let mut queue: VecDeque<_> = commands.into();
        while let Some(command) = queue.pop_front() {
            let follow_up = self.execute(command).await;
            for command in follow_up.into_iter().rev() {
                queue.push_front(command);
            }
        }
    }

    async fn execute(&self, command: Command<H::File>) -> Vec<Command<H::File>> {
        let host = &self.host;
        match command {
            Command::LoadProfile => match host.fetch_profile().await {
                Ok(record) => return self.dispatch(Message::ProfileLoaded(record)),
                Err(e) => {
                    error_log!("profile load failed: {}", e);
                    return self.dispatch(Message::ProfileLoadFailed(e.to_string()));
                }
            },
            Command::SubmitSave(payload) => match host.submit_profile(&payload).await {
                Ok(()) => return self.dispatch(Message::SaveSucceeded),
                Err(e) => {
                    error_log!("profile save failed: {}", e);
                    return self.dispatch(Message::SaveFailed(e.to_string()));
                }
            },
            Command::SetEditMode(enabled) => host.set_edit_mode(enabled),
            Command::SetDisplayName(name) => host.set_display_name(&name),
            Command::FillInputs(values) => {
                for (field, value) in values {
                    host.write_input(field.key(), &value);
                }
            }
            Command::RestoreInputs(values) => {
                for (id, value) in values {
                    host.write_input(&id, &value);
                }
            }
            Command::SetConfirmDialog(open) => host.set_confirm_dialog(open),
            Command::SetSuccessDialog(open) => host.set_success_dialog(open),
            Command::ClearFileChooser => host.clear_file_chooser(),
            Command::Alert(message) => host.alert(&message),
            Command::PersistImageUrl(url) => host.persist_image_url(&url),
            Command::ResolveImage { url, retry } => {
                let outcome = self.images.resolve(host, &url, retry).await;
                debug_log!("image {} resolved as {:?}", url, outcome);
            }
            Command::ShowFallbackIcon => {
                self.images.invalidate();
                host.show_fallback_icon();
            }
            Command::ReleaseObjectUrl => self.images.release(host),
            Command::PreviewFile(file) => {
                self.images.invalidate();
                host.preview_file(&file);
            }
        }
        Vec::new()
    }

    // -------------------------------------------------------------------
    // Page actions
    // -------------------------------------------------------------------

    /// Initial load and post-save refresh.
    pub async fn load(&self) {
        self.run(vec![Command::LoadProfile]).await;
    }

    pub async fn begin_edit(&self) {
        let snapshot = self.host.read_inputs();
        self.handle(Message::BeginEdit { snapshot }).await;
    }

    pub async fn request_save(&self) {
        self.handle(Message::RequestSave).await;
    }

    pub async fn dismiss_confirm(&self) {
        self.handle(Message::DismissConfirm).await;
    }

    pub async fn confirm_save(&self) {
        let inputs = self.host.read_inputs();
        self.handle(Message::ConfirmSave { inputs }).await;
    }

    pub async fn acknowledge_success(&self) {
        self.handle(Message::AcknowledgeSuccess).await;
    }

    pub async fn cancel_edit(&self) {
        self.handle(Message::CancelEdit).await;
    }

    pub async fn select_image(&self, file: H::File) {
        self.handle(Message::ImageSelected(file)).await;
    }

    /// Page is going away: drop the live object URL.
    pub fn teardown(&self) {
        self.images.invalidate();
        self.images.release(&self.host);
    }
}
