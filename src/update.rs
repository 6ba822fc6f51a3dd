// src/update.rs
//
// Pure reducer for the profile page.  No DOM, no network: every effect is
// returned as a `Command` for the controller to run.
//
use crate::debug_log;
use crate::image_loader::ImageRetry;
use crate::messages::{Command, Message};
use crate::models::SavePayload;
use crate::state::{EditMode, ProfileState};

pub fn update<F: Clone>(state: &mut ProfileState<F>, msg: Message<F>) -> Vec<Command<F>> {
    let mode = state.mode;
    match (mode, msg) {
        // ---------------------------------------------------------------
        // Loader
        // ---------------------------------------------------------------
        (mode, Message::ProfileLoaded(record)) => {
            // A load can land while an edit session is open (the user clicked
            // Edit before the initial load finished).  The session stays
            // open and the cancel snapshot takes the loaded values.
            let in_session = matches!(mode, EditMode::Editing | EditMode::ConfirmPending);
            let values = record.field_values();

            let mut commands = vec![
                Command::SetDisplayName(record.display_name().to_string()),
                Command::FillInputs(values.clone()),
            ];
            if in_session {
                for (field, value) in values {
                    state.edit_buffer.insert(field.key().to_string(), value);
                }
            } else {
                state.mode = EditMode::Viewing;
                commands.push(Command::SetEditMode(false));
            }

            // A selected file keeps its local preview until save or cancel.
            let previewing = state.pending_image.is_some();
            match record.profile_image() {
                Some(reference) => {
                    let url = state.api.resolve_image_url(reference);
                    state.persisted_image_url = Some(url.clone());
                    commands.push(Command::PersistImageUrl(url.clone()));
                    if !previewing {
                        commands.push(Command::ResolveImage {
                            url,
                            retry: ImageRetry::AFTER_LOAD,
                        });
                    }
                }
                None if !previewing => commands.push(Command::ShowFallbackIcon),
                None => {}
            }
            commands
        }
        (_, Message::ProfileLoadFailed(reason)) => {
            vec![Command::Alert(format!("Could not load profile data: {}", reason))]
        }

        // ---------------------------------------------------------------
        // Edit session
        // ---------------------------------------------------------------
        (EditMode::Viewing, Message::BeginEdit { snapshot }) => {
            state.edit_buffer = snapshot.into_iter().collect();
            state.mode = EditMode::Editing;
            vec![Command::SetEditMode(true)]
        }
        (EditMode::Editing, Message::RequestSave) => {
            state.mode = EditMode::ConfirmPending;
            vec![Command::SetConfirmDialog(true)]
        }
        (EditMode::ConfirmPending, Message::DismissConfirm) => {
            state.mode = EditMode::Editing;
            vec![Command::SetConfirmDialog(false)]
        }
        (EditMode::ConfirmPending, Message::ConfirmSave { inputs }) => {
            state.mode = EditMode::Saving;
            let payload = SavePayload::from_inputs(&inputs, state.pending_image.clone());
            vec![Command::SubmitSave(payload)]
        }
        (EditMode::Saving, Message::SaveSucceeded) => {
            // Mode flips back to Viewing once the reload lands (or the
            // success dialog is acknowledged, if the reload fails).
            state.pending_image = None;
            state.edit_buffer.clear();
            state.success_dialog_open = true;
            vec![
                Command::ClearFileChooser,
                Command::SetConfirmDialog(false),
                Command::LoadProfile,
                Command::SetSuccessDialog(true),
            ]
        }
        (EditMode::Saving, Message::SaveFailed(reason)) => {
            // Edits stay live; the user can retry or cancel.
            state.mode = EditMode::Editing;
            vec![
                Command::Alert(format!("Could not save changes: {}", reason)),
                Command::SetConfirmDialog(false),
            ]
        }
        (_, Message::AcknowledgeSuccess) if state.success_dialog_open => {
            state.success_dialog_open = false;
            state.mode = EditMode::Viewing;
            vec![Command::SetSuccessDialog(false), Command::SetEditMode(false)]
        }
        (EditMode::Editing, Message::CancelEdit) => {
            let buffer = std::mem::take(&mut state.edit_buffer);
            let mut commands = vec![
                Command::RestoreInputs(buffer.into_iter().collect()),
                Command::SetEditMode(false),
            ];

            if state.pending_image.take().is_some() {
                commands.push(Command::ClearFileChooser);
                match &state.persisted_image_url {
                    Some(url) => commands.push(Command::ResolveImage {
                        url: url.clone(),
                        retry: ImageRetry::AFTER_CANCEL,
                    }),
                    None => commands.push(Command::ShowFallbackIcon),
                }
            }

            state.mode = EditMode::Viewing;
            commands
        }
        (EditMode::Editing, Message::ImageSelected(file)) => {
            state.pending_image = Some(file.clone());
            vec![Command::ReleaseObjectUrl, Command::PreviewFile(file)]
        }

        (mode, msg) => {
            debug_log!("ignoring {} while {:?}", msg.label(), mode);
            Vec::new()
        }
    }
}
