use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// One submitted tag. Rows are only ever inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeWordFileTag {
    pub file_id: String,
    pub session_id: String,
    pub tag_id: String,
    pub tag_value_id: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TagPostRequest {
    #[validate(required, custom(function = "validate_uuid"))]
    pub audio_file_id: Option<String>,

    #[validate(required, custom(function = "validate_uuid"))]
    pub tag_id: Option<String>,

    #[validate(required, custom(function = "validate_uuid"))]
    pub tag_value_id: Option<String>,

    #[validate(required, custom(function = "validate_not_blank"))]
    pub tag_value: Option<String>,
}

// Ids are bound as uuid parameters; anything else would fail in the database
fn validate_uuid(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid"))
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPostResponse {
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TagPostRequest {
        TagPostRequest {
            audio_file_id: Some("2b0f2c8e-9a1d-4f7a-8f11-5d1f7a0c9e21".to_string()),
            tag_id: Some("5e6f7a8b-1c2d-4e3f-8a9b-0c1d2e3f4a5b".to_string()),
            tag_value_id: Some("7d3c2a10-4a4e-4a55-9a57-8cb0f6f1e0a2".to_string()),
            tag_value: Some("yes".to_string()),
        }
    }

    #[test]
    fn test_well_formed_request_validates() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_malformed_ids_are_reported_by_field() {
        let form = TagPostRequest {
            audio_file_id: Some("not-a-uuid".to_string()),
            tag_id: Some("   ".to_string()),
            tag_value_id: Some("x".to_string()),
            ..request()
        };

        let errors = form.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("audio_file_id"));
        assert!(fields.contains_key("tag_id"));
        assert!(fields.contains_key("tag_value_id"));
        assert!(!fields.contains_key("tag_value"));
    }

    #[test]
    fn test_blank_tag_value_is_rejected() {
        let form = TagPostRequest {
            tag_value: Some("  ".to_string()),
            ..request()
        };

        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tag_value"));
    }
}
