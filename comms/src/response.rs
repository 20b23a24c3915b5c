use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A room as described by the room service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomResponse {
    /// Opaque identifier of the room
    pub uid: String,
    /// Display names of everyone who has entered the room, in joining order
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Body of a successful join.
///
/// Nothing in it is required, a join is considered successful based on the status code alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Every room known to the room service, keyed by uid.
pub type RoomDirectory = HashMap<String, RoomResponse>;
