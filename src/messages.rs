// src/messages.rs
//
// Everything that can happen on the profile page, and everything the reducer
// can ask the outside world to do in response.
//
use crate::image_loader::ImageRetry;
use crate::models::{ProfileField, ProfileRecord, SavePayload};

/// User actions and async results.  `F` is the local file type.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<F> {
    // Loader results
    ProfileLoaded(ProfileRecord),
    ProfileLoadFailed(String),

    // Edit session
    BeginEdit { snapshot: Vec<(String, String)> }, // every input's value right now
    RequestSave,                                   // opens the confirmation dialog
    DismissConfirm,                                // "cancel" inside the dialog
    ConfirmSave { inputs: Vec<(String, String)> },
    SaveSucceeded,
    SaveFailed(String),
    AcknowledgeSuccess,
    CancelEdit,
    ImageSelected(F),
}

impl<F> Message<F> {
    pub fn label(&self) -> &'static str {
        match self {
            Message::ProfileLoaded(_) => "ProfileLoaded",
            Message::ProfileLoadFailed(_) => "ProfileLoadFailed",
            Message::BeginEdit { .. } => "BeginEdit",
            Message::RequestSave => "RequestSave",
            Message::DismissConfirm => "DismissConfirm",
            Message::ConfirmSave { .. } => "ConfirmSave",
            Message::SaveSucceeded => "SaveSucceeded",
            Message::SaveFailed(_) => "SaveFailed",
            Message::AcknowledgeSuccess => "AcknowledgeSuccess",
            Message::CancelEdit => "CancelEdit",
            Message::ImageSelected(_) => "ImageSelected",
        }
    }
}

/// Side effects, executed in order by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<F> {
    /// Fetch the profile record and feed the result back as a message.
    LoadProfile,
    /// Submit the update and feed the result back as a message.
    SubmitSave(SavePayload<F>),

    SetEditMode(bool),
    SetDisplayName(String),
    FillInputs(Vec<(ProfileField, String)>),
    RestoreInputs(Vec<(String, String)>),
    SetConfirmDialog(bool),
    SetSuccessDialog(bool),
    ClearFileChooser,
    Alert(String),

    PersistImageUrl(String),
    ResolveImage { url: String, retry: ImageRetry },
    ShowFallbackIcon,
    ReleaseObjectUrl,
    PreviewFile(F),
}
