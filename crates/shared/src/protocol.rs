use serde::{Deserialize, Serialize};

use crate::{domain::Doctor, error::ApiError};

/// Frames a directory backend pushes over its update socket. Every update
/// carries the complete list, never a diff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DirectoryPush {
    DoctorsUpdated { doctors: Vec<Doctor> },
    Error(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn decodes_doctors_updated_frame() {
        let frame = r#"{"type":"doctors_updated","payload":{"doctors":[
            {"id":2,"name":"Petrova","specialization":"Neurology","education":"TashPMI"}
        ]}}"#;
        let push: DirectoryPush = serde_json::from_str(frame).expect("frame");
        match push {
            DirectoryPush::DoctorsUpdated { doctors } => {
                assert_eq!(doctors.len(), 1);
                assert_eq!(doctors[0].education.as_deref(), Some("TashPMI"));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn decodes_error_frame() {
        let frame = r#"{"type":"error","payload":{"code":"internal","message":"db down"}}"#;
        let push: DirectoryPush = serde_json::from_str(frame).expect("frame");
        assert!(matches!(
            push,
            DirectoryPush::Error(ApiError {
                code: ErrorCode::Internal,
                ..
            })
        ));
    }
}
