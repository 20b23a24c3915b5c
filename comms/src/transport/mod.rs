/// Transport over HTTP for a client to be able to interact with the room service
#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
mod common;
