use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset reference the directory backend uses for "no photo uploaded".
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Stable doctor identifier. Backends hand out either numeric or string keys,
/// so both shapes are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoctorId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorId::Number(id) => write!(f, "{id}"),
            DoctorId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for DoctorId {
    fn from(value: i64) -> Self {
        DoctorId::Number(value)
    }
}

impl From<&str> for DoctorId {
    fn from(value: &str) -> Self {
        DoctorId::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Doctor {
    pub fn new(
        id: impl Into<DoctorId>,
        name: impl Into<String>,
        specialization: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialization: specialization.into(),
            experience: None,
            education: None,
            image: None,
        }
    }

    pub fn with_experience(mut self, experience: impl Into<String>) -> Self {
        self.experience = Some(experience.into());
        self
    }

    pub fn with_education(mut self, education: impl Into<String>) -> Self {
        self.education = Some(education.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Photo to show, or `None` when the placeholder graphic should be drawn.
    pub fn photo(&self) -> Option<&str> {
        self.image
            .as_deref()
            .filter(|image| !image.is_empty() && *image != PLACEHOLDER_IMAGE)
    }

    /// Experience text, hidden when missing or whitespace-only.
    pub fn visible_experience(&self) -> Option<&str> {
        self.experience
            .as_deref()
            .filter(|experience| !experience.trim().is_empty())
    }

    pub fn visible_education(&self) -> Option<&str> {
        self.education
            .as_deref()
            .filter(|education| !education.is_empty())
    }
}
