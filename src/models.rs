//! Profile record as served by `/api/auth/me/` and the save payload sent back.
//!
//! Server keys are never trusted blindly: only the fields listed in
//! [`ProfileField`] are read from a record, and only the writable subset is
//! ever submitted.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{ProfileError, Result};

/// Shown in the header when the record has no first name.
pub const DEFAULT_DISPLAY_NAME: &str = "PROFILE";

/// Multipart field name for the optional avatar upload.
pub const PROFILE_IMAGE_FIELD: &str = "profile_image";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    FirstName,
    LastName,
    Birthday,
    Phone,
    Country,
    /// Display only; the update endpoint does not accept it.
    Email,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Birthday,
        ProfileField::Phone,
        ProfileField::Country,
        ProfileField::Email,
    ];

    /// The save allow-list.
    pub const WRITABLE: [ProfileField; 5] = [
        ProfileField::FirstName,
        ProfileField::LastName,
        ProfileField::Birthday,
        ProfileField::Phone,
        ProfileField::Country,
    ];

    /// JSON key, multipart field name and input element id all share this.
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::FirstName => "first_name",
            ProfileField::LastName => "last_name",
            ProfileField::Birthday => "birthday",
            ProfileField::Phone => "phone",
            ProfileField::Country => "country",
            ProfileField::Email => "email",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn is_writable(self) -> bool {
        Self::WRITABLE.contains(&self)
    }
}

/// One fetch worth of profile data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileRecord {
    values: BTreeMap<ProfileField, String>,
    profile_image: Option<String>,
}

impl ProfileRecord {
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ProfileError::Decode("profile record is not a JSON object".into()))?;

        let mut values = BTreeMap::new();
        for field in ProfileField::ALL {
            let Some(raw) = object.get(field.key()) else {
                continue;
            };
            if let Some(text) = scalar_text(raw) {
                values.insert(field, text);
            }
        }

        let profile_image = object
            .get(PROFILE_IMAGE_FIELD)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        Ok(Self { values, profile_image })
    }

    /// Builder used by tests and by callers that already hold typed data.
    pub fn with_field(mut self, field: ProfileField, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Value for `field`, empty when the record did not carry it.
    pub fn get(&self, field: ProfileField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn display_name(&self) -> &str {
        match self.get(ProfileField::FirstName) {
            "" => DEFAULT_DISPLAY_NAME,
            name => name,
        }
    }

    /// Fields present in the record, in table order.
    pub fn field_values(&self) -> Vec<(ProfileField, String)> {
        self.values.iter().map(|(f, v)| (*f, v.clone())).collect()
    }

    /// Raw image reference: an absolute URL or a server-relative path.
    pub fn profile_image(&self) -> Option<&str> {
        self.profile_image.as_deref()
    }
}

/// Strings pass through, null becomes empty, numbers and booleans use their
/// text form.  Arrays and objects have no input to land in.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Body of the `PUT /api/auth/me/` multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePayload<F> {
    pub fields: Vec<(ProfileField, String)>,
    pub image: Option<F>,
}

impl<F> SavePayload<F> {
    /// Keep only the allow-listed inputs out of whatever the page holds.
    pub fn from_inputs(inputs: &[(String, String)], image: Option<F>) -> Self {
        let fields = inputs
            .iter()
            .filter_map(|(id, value)| {
                ProfileField::from_key(id)
                    .filter(|f| f.is_writable())
                    .map(|f| (f, value.clone()))
            })
            .collect();
        Self { fields, image }
    }

    pub fn field_keys(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(f, _)| f.key()).collect()
    }
}
