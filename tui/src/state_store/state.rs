use comms::{
    response::{JoinRoomResponse, RoomDirectory, RoomResponse},
    transport::client::RequestError,
};
use tracing::{debug, error, info, warn};

/// The request the state store is currently waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    CreateRoom,
    JoinRoom,
    RefreshRoom,
    ListRooms,
}

impl PendingRequest {
    pub fn description(&self) -> &'static str {
        match self {
            PendingRequest::CreateRoom => "Creating room...",
            PendingRequest::JoinRoom => "Joining room...",
            PendingRequest::RefreshRoom => "Refreshing room...",
            PendingRequest::ListRooms => "Listing rooms...",
        }
    }
}

/// RoomInfo holds what is known about a single room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    /// The uid handed out by the room service
    pub uid: String,
    /// Display names of the participants
    pub participants: Vec<String>,
}

impl From<RoomResponse> for RoomInfo {
    fn from(room: RoomResponse) -> Self {
        RoomInfo {
            uid: room.uid,
            participants: room.participants,
        }
    }
}

/// State holds the presentation state of the application
#[derive(Debug, Clone)]
pub struct State {
    /// Base url of the room service the client talks to
    pub server_url: String,
    /// The room shown in the info panel, the panel is hidden while this is empty
    pub room_info: Option<RoomInfo>,
    pub join_form_visible: bool,
    /// Set by a join answered with 404, cleared only by a successful join
    pub room_not_found_visible: bool,
    /// Rooms fetched from the room service, sorted by uid
    pub room_directory: Option<Vec<RoomInfo>>,
    /// Blocking message which has to be dismissed before anything else can be done
    pub notice: Option<String>,
    pub pending_request: Option<PendingRequest>,
}

impl State {
    pub fn new(server_url: impl Into<String>) -> Self {
        State {
            server_url: server_url.into(),
            room_info: None,
            join_form_visible: false,
            room_not_found_visible: false,
            room_directory: None,
            notice: None,
            pending_request: None,
        }
    }

    pub fn show_join_room_form(&mut self) {
        self.join_form_visible = true;
    }

    pub fn show_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_request_pending(&self) -> bool {
        self.pending_request.is_some()
    }

    pub fn mark_request_start(&mut self, request: PendingRequest) {
        self.pending_request = Some(request);
    }

    /// Processes the result of a create room request. Failures leave the visible state untouched.
    pub fn process_create_room_result(&mut self, result: Result<RoomResponse, RequestError>) {
        self.pending_request = None;

        match result {
            Ok(room) => {
                info!(uid = %room.uid, "room created");
                self.room_info = Some(RoomInfo::from(room));
            }
            Err(err) => error!(%err, "failed to create room"),
        }
    }

    /// Processes the result of joining the room with the given uid.
    pub fn process_join_room_result(
        &mut self,
        uid: String,
        result: Result<JoinRoomResponse, RequestError>,
    ) {
        self.pending_request = None;

        match result {
            Ok(joined) => {
                info!(%uid, "joined room");
                self.room_not_found_visible = false;
                self.room_info = Some(RoomInfo {
                    // the answer body is optional, fall back to what the user typed
                    uid: joined.uid.unwrap_or(uid),
                    participants: joined.participants,
                });
            }
            Err(err) if err.is_not_found() => {
                warn!(%uid, "room to join does not exist");
                self.room_not_found_visible = true;
            }
            Err(err) => error!(%err, "failed to join room"),
        }
    }

    /// Processes the result of re-fetching the room with the given uid.
    pub fn process_refresh_room_result(
        &mut self,
        uid: String,
        result: Result<RoomResponse, RequestError>,
    ) {
        self.pending_request = None;

        match result {
            Ok(room) => match self.room_info.as_mut() {
                Some(room_info) if room_info.uid == uid => *room_info = RoomInfo::from(room),
                _ => debug!(%uid, "refreshed room is no longer displayed"),
            },
            Err(err) if err.is_not_found() => warn!(%uid, "displayed room no longer exists"),
            Err(err) => error!(%err, "failed to refresh room"),
        }
    }

    pub fn process_list_rooms_result(&mut self, result: Result<RoomDirectory, RequestError>) {
        self.pending_request = None;

        match result {
            Ok(directory) => {
                let mut rooms = directory
                    .into_values()
                    .map(RoomInfo::from)
                    .collect::<Vec<RoomInfo>>();
                rooms.sort_by(|room_a, room_b| room_a.uid.cmp(&room_b.uid));

                debug!(count = rooms.len(), "listed rooms");
                self.room_directory = Some(rooms);
            }
            Err(err) => error!(%err, "failed to list rooms"),
        }
    }
}

#[cfg(test)]
mod tests {
    use comms::transport::client::StatusCode;

    use super::*;

    fn room(uid: &str, participants: &[&str]) -> RoomResponse {
        RoomResponse {
            uid: uid.into(),
            participants: participants.iter().map(|name| String::from(*name)).collect(),
        }
    }

    fn not_found() -> RequestError {
        RequestError::NotFound {
            body: r#"{"detail":"Room not found"}"#.into(),
        }
    }

    fn server_error() -> RequestError {
        RequestError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        }
    }

    #[test]
    fn test_created_room_is_displayed() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.mark_request_start(PendingRequest::CreateRoom);

        state.process_create_room_result(Ok(room("ABC123", &["Alice"])));

        assert_eq!(
            state.room_info,
            Some(RoomInfo {
                uid: "ABC123".into(),
                participants: vec!["Alice".into()],
            })
        );
        assert!(!state.is_request_pending());
    }

    #[test]
    fn test_failed_create_displays_nothing() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.mark_request_start(PendingRequest::CreateRoom);

        state.process_create_room_result(Err(server_error()));

        assert_eq!(state.room_info, None);
        assert_eq!(state.notice, None);
        assert!(!state.room_not_found_visible);
        assert!(!state.is_request_pending());
    }

    #[test]
    fn test_failed_create_keeps_previous_room() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.process_create_room_result(Ok(room("ABC123", &["Alice"])));

        state.process_create_room_result(Err(not_found()));

        assert_eq!(state.room_info.map(|room| room.uid), Some("ABC123".into()));
        assert!(!state.room_not_found_visible);
    }

    #[test]
    fn test_room_not_found_stays_until_successful_join() {
        let mut state = State::new("http://127.0.0.1:8000");

        state.process_join_room_result("missing".into(), Err(not_found()));
        assert!(state.room_not_found_visible);

        // unrelated outcomes do not clear the indicator
        state.process_create_room_result(Ok(room("ABC123", &["Alice"])));
        state.process_join_room_result("ABC123".into(), Err(server_error()));
        state.process_list_rooms_result(Ok(RoomDirectory::new()));
        assert!(state.room_not_found_visible);

        state.process_join_room_result(
            "ABC123".into(),
            Ok(JoinRoomResponse {
                uid: Some("ABC123".into()),
                participants: vec!["Alice".into(), "Bob".into()],
            }),
        );
        assert!(!state.room_not_found_visible);
        assert_eq!(
            state.room_info,
            Some(RoomInfo {
                uid: "ABC123".into(),
                participants: vec!["Alice".into(), "Bob".into()],
            })
        );
    }

    #[test]
    fn test_successful_join_hides_indicator_regardless_of_prior_state() {
        for prior in [false, true] {
            let mut state = State::new("http://127.0.0.1:8000");
            state.room_not_found_visible = prior;

            state.process_join_room_result("room-1".into(), Ok(JoinRoomResponse::default()));

            assert!(!state.room_not_found_visible);
        }
    }

    #[test]
    fn test_join_without_body_displays_submitted_uid() {
        let mut state = State::new("http://127.0.0.1:8000");

        state.process_join_room_result("room-1".into(), Ok(JoinRoomResponse::default()));

        assert_eq!(
            state.room_info,
            Some(RoomInfo {
                uid: "room-1".into(),
                participants: vec![],
            })
        );
    }

    #[test]
    fn test_refresh_replaces_displayed_room_only() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.process_create_room_result(Ok(room("ABC123", &["Alice"])));

        state.process_refresh_room_result("other".into(), Ok(room("other", &["Zed"])));
        assert_eq!(
            state.room_info.as_ref().map(|room| room.participants.clone()),
            Some(vec!["Alice".into()])
        );

        state.process_refresh_room_result("ABC123".into(), Ok(room("ABC123", &["Alice", "Bob"])));
        assert_eq!(
            state.room_info.as_ref().map(|room| room.participants.clone()),
            Some(vec!["Alice".into(), "Bob".into()])
        );

        state.process_refresh_room_result("ABC123".into(), Err(not_found()));
        assert!(state.room_info.is_some());
        assert!(!state.room_not_found_visible);
    }

    #[test]
    fn test_listed_rooms_are_sorted() {
        let mut state = State::new("http://127.0.0.1:8000");
        let directory: RoomDirectory = [room("b", &["Bob"]), room("a", &["Alice", "Ann"])]
            .into_iter()
            .map(|room| (room.uid.clone(), room))
            .collect();

        state.process_list_rooms_result(Ok(directory));

        let uids = state
            .room_directory
            .unwrap()
            .into_iter()
            .map(|room| room.uid)
            .collect::<Vec<String>>();
        assert_eq!(uids, vec!["a", "b"]);
    }

    #[test]
    fn test_notice_lifecycle() {
        let mut state = State::new("http://127.0.0.1:8000");

        state.show_notice("Please enter your name");
        assert_eq!(state.notice.as_deref(), Some("Please enter your name"));

        state.dismiss_notice();
        assert_eq!(state.notice, None);
    }
}
