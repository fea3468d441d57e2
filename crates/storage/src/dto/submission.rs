use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

/// File name recorded when code is typed in rather than uploaded.
pub const DEFAULT_WRITTEN_FILE_NAME: &str = "written_code.py";

/// File name recorded when an upload does not carry one.
pub const DEFAULT_UPLOADED_FILE_NAME: &str = "uploaded_file.py";

/// Request payload for scoring a code snippet
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct EvaluateRequest {
    #[validate(
        length(max = 255, message = "Name must be at most 255 characters"),
        custom(function = "not_blank", message = "Name is required")
    )]
    #[serde(default)]
    #[schema(example = "Ada")]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Code is required"))]
    #[serde(default)]
    #[schema(example = "def add(a, b):\n    return a + b\n")]
    pub code: String,

    #[validate(length(max = 255, message = "File name must be at most 255 characters"))]
    #[serde(default)]
    pub file_name: Option<String>,
}

impl EvaluateRequest {
    pub fn file_name_or_default(&self) -> &str {
        match self.file_name.as_deref().map(str::trim) {
            Some(file_name) if !file_name.is_empty() => file_name,
            _ => DEFAULT_WRITTEN_FILE_NAME,
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::from("must not be blank"));
        return Err(error);
    }
    Ok(())
}
