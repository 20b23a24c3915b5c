use serde::{Deserialize, Serialize};

/// Reasons a request is rejected before anything is sent to the room service.
///
/// The messages are meant to be shown to the user as they are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter your name")]
    EmptyName,
    #[error("Please enter your name and UID")]
    EmptyNameOrUid,
}

/// Request for creating a new room, with the creator as its first participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Display name of the participant creating the room.
    pub name: String,
}

impl CreateRoomRequest {
    /// Builds the request from raw user input. Surrounding whitespace is dropped.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            name: String::from(name),
        })
    }
}

/// Request for joining an existing room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    /// Identifier of the room, as handed out by the room service at creation time.
    pub uid: String,
    /// Display name of the joining participant.
    pub name: String,
}

impl JoinRoomRequest {
    /// Builds the request from raw user input. Both fields are required, surrounding whitespace is dropped.
    pub fn new(uid: &str, name: &str) -> Result<Self, ValidationError> {
        let (uid, name) = (uid.trim(), name.trim());
        if uid.is_empty() || name.is_empty() {
            return Err(ValidationError::EmptyNameOrUid);
        }

        Ok(Self {
            uid: String::from(uid),
            name: String::from(name),
        })
    }
}
