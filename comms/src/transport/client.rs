use reqwest::{Response, Url};
use tracing::debug;

pub use reqwest::StatusCode;

use crate::{
    request::{CreateRoomRequest, JoinRoomRequest},
    response::{JoinRoomResponse, RoomDirectory, RoomResponse},
};

use super::common::{CREATE_ROOM_PATH, JOIN_ROOM_PATH, ROOMS_PATH, ROOM_PATH};

/// Address the room service listens on during local development.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

/// Categorized failure of a single call to the room service.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidServerUrl { url: String, reason: String },
    /// The request could not be sent, or the response could not be read
    #[error("could not reach the room service: {0}")]
    Transport(#[from] reqwest::Error),
    /// The room service answered with 404
    #[error("room not found: {body}")]
    NotFound { body: String },
    /// The room service answered with any other non-success status
    #[error("room service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    /// The room service answered with success but the body has an unexpected shape
    #[error("could not decode the room service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RequestError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RequestError::NotFound { .. })
    }
}

/// [RoomClient] is a thin wrapper around a [reqwest::Client] which speaks the room service API.
///
/// Every call is a single attempt, there is no retry and no timeout.
/// Cloning is cheap and clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct RoomClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RoomClient {
    /// Creates a client for the room service reachable under `base_url`.
    ///
    /// # Arguments
    ///
    /// - `base_url` - Absolute url, e.g. `http://127.0.0.1:8000` or `https://rooms.example.com/api`
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        let invalid = |reason: String| RequestError::InvalidServerUrl {
            url: String::from(base_url),
            reason,
        };

        let mut url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid(String::from("url can not carry a path")));
        }
        url.set_query(None);
        url.set_fragment(None);

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Creates a room with the requester as its first participant.
    pub async fn create_room(
        &self,
        request: &CreateRoomRequest,
    ) -> Result<RoomResponse, RequestError> {
        let response = self
            .http
            .post(self.endpoint(&[CREATE_ROOM_PATH]))
            .json(request)
            .send()
            .await?;

        let body = read_success_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Joins an existing room. Fails with [RequestError::NotFound] if the room service does not know the uid.
    ///
    /// The body of a successful answer is optional, an unreadable one decodes to [JoinRoomResponse::default].
    pub async fn join_room(
        &self,
        request: &JoinRoomRequest,
    ) -> Result<JoinRoomResponse, RequestError> {
        let response = self
            .http
            .post(self.endpoint(&[JOIN_ROOM_PATH]))
            .json(request)
            .send()
            .await?;

        let body = read_success_body(response).await?;

        Ok(serde_json::from_str(&body).unwrap_or_else(|err| {
            debug!(%err, "join answer carries no room description");
            JoinRoomResponse::default()
        }))
    }

    /// Fetches the current description of a single room.
    pub async fn get_room(&self, uid: &str) -> Result<RoomResponse, RequestError> {
        let response = self
            .http
            .get(self.endpoint(&[ROOM_PATH, uid]))
            .send()
            .await?;

        let body = read_success_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches every room the room service knows about.
    pub async fn list_rooms(&self) -> Result<RoomDirectory, RequestError> {
        let response = self.http.get(self.endpoint(&[ROOMS_PATH])).send().await?;

        let body = read_success_body(response).await?;

        Ok(serde_json::from_str(&body)?)
    }

    // appends the segments to the base url, each segment is percent encoded on its own
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // can not fail, urls that can not be a base are rejected in the constructor
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }
}

// the status alone picks the error category, an error body that can not be read is left empty
async fn read_success_body(response: Response) -> Result<String, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.text().await?);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(RequestError::NotFound { body }),
        status => Err(RequestError::Status { status, body }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(base_url: &str, segments: &[&str]) -> String {
        RoomClient::new(base_url)
            .unwrap()
            .endpoint(segments)
            .to_string()
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        assert_eq!(
            endpoint("http://127.0.0.1:8000", &[CREATE_ROOM_PATH]),
            "http://127.0.0.1:8000/create-room"
        );
        assert_eq!(
            endpoint("http://127.0.0.1:8000/", &[JOIN_ROOM_PATH]),
            "http://127.0.0.1:8000/join-room"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        assert_eq!(
            endpoint("https://rooms.example.com/api", &[ROOMS_PATH]),
            "https://rooms.example.com/api/rooms"
        );
        assert_eq!(
            endpoint("https://rooms.example.com/api/?debug=1#top", &[ROOMS_PATH]),
            "https://rooms.example.com/api/rooms"
        );
    }

    #[test]
    fn test_endpoint_encodes_uid_as_single_segment() {
        assert_eq!(
            endpoint("http://localhost:8000", &[ROOM_PATH, "a/b c"]),
            "http://localhost:8000/room/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_invalid_server_urls() {
        for url in ["", "127.0.0.1:8000/rooms", "mailto:someone@example.com"] {
            assert!(
                matches!(
                    RoomClient::new(url),
                    Err(RequestError::InvalidServerUrl { .. })
                ),
                "url {:?} should be rejected",
                url
            );
        }
    }
}
