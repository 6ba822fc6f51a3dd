use std::collections::BTreeMap;

use crate::network::ApiConfig;

/// Where the edit session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Inputs disabled, edit button shown.
    #[default]
    Viewing,
    /// Inputs enabled, save / cancel / choose-file shown.
    Editing,
    /// Confirmation dialog open over the still-enabled inputs.
    ConfirmPending,
    /// Update request in flight.
    Saving,
}

/// All mutable page state, owned by the controller.
#[derive(Debug, Clone)]
pub struct ProfileState<F> {
    pub api: ApiConfig,
    pub mode: EditMode,
    /// Input values captured when edit mode was entered, keyed by input id.
    pub edit_buffer: BTreeMap<String, String>,
    /// Locally chosen image waiting to be saved.
    pub pending_image: Option<F>,
    /// Last resolved server image, used to restore after a cancelled edit.
    pub persisted_image_url: Option<String>,
    pub success_dialog_open: bool,
}

impl<F> ProfileState<F> {
    pub fn new(api: ApiConfig, persisted_image_url: Option<String>) -> Self {
        Self {
            api,
            mode: EditMode::Viewing,
            edit_buffer: BTreeMap::new(),
            pending_image: None,
            persisted_image_url,
            success_dialog_open: false,
        }
    }
}
