/// Payloads the client sends to the room service, validated before they leave the client
pub mod request;
/// Payloads the room service answers with
pub mod response;
/// HTTP transport to the room service.
/// Requires the 'client' feature to be enabled and will bring in reqwest alongside with tracing
pub mod transport;
