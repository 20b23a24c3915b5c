// Path segments of the room service endpoints, relative to the configured base url.
pub const CREATE_ROOM_PATH: &str = "create-room";
pub const JOIN_ROOM_PATH: &str = "join-room";
pub const ROOM_PATH: &str = "room";
pub const ROOMS_PATH: &str = "rooms";
