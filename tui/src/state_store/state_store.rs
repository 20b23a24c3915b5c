use comms::{
    request::{CreateRoomRequest, JoinRoomRequest},
    response::{JoinRoomResponse, RoomDirectory, RoomResponse},
    transport::client::{RequestError, RoomClient},
};
use tokio::{
    sync::{
        broadcast,
        mpsc::{self, UnboundedReceiver, UnboundedSender},
    },
    task::JoinSet,
};
use tracing::{debug, error};

use crate::termination::{Interrupted, Terminator};

use super::{action::Action, PendingRequest, State};

/// Result of a request running in the background, applied to the state once the request completes
enum RequestOutcome {
    RoomCreated(Result<RoomResponse, RequestError>),
    RoomJoined {
        uid: String,
        result: Result<JoinRoomResponse, RequestError>,
    },
    RoomRefreshed {
        uid: String,
        result: Result<RoomResponse, RequestError>,
    },
    RoomsListed(Result<RoomDirectory, RequestError>),
}

impl RequestOutcome {
    fn apply(self, state: &mut State) {
        match self {
            RequestOutcome::RoomCreated(result) => state.process_create_room_result(result),
            RequestOutcome::RoomJoined { uid, result } => {
                state.process_join_room_result(uid, result)
            }
            RequestOutcome::RoomRefreshed { uid, result } => {
                state.process_refresh_room_result(uid, result)
            }
            RequestOutcome::RoomsListed(result) => state.process_list_rooms_result(result),
        }
    }
}

pub struct StateStore {
    state_tx: UnboundedSender<State>,
    client: RoomClient,
}

impl StateStore {
    pub fn new(client: RoomClient) -> (Self, UnboundedReceiver<State>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel::<State>();

        (StateStore { state_tx, client }, state_rx)
    }
}

impl StateStore {
    pub async fn main_loop(
        self,
        mut terminator: Terminator,
        mut action_rx: UnboundedReceiver<Action>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut state = State::new(self.client.base_url().as_str());
        // at most one request runs at a time, see [StateStore::reject_while_pending]
        let mut in_flight: JoinSet<RequestOutcome> = JoinSet::new();

        // the initial state once
        self.state_tx.send(state.clone())?;

        let result = loop {
            tokio::select! {
                // Handle the actions coming from the UI
                Some(action) = action_rx.recv() => match action {
                    Action::Exit => {
                        let _ = terminator.terminate(Interrupted::UserInt);

                        break Interrupted::UserInt;
                    },
                    action => self.handle_action(action, &mut state, &mut in_flight),
                },
                // Apply the outcome of a finished request
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => match joined {
                    Ok(outcome) => outcome.apply(&mut state),
                    Err(err) => {
                        error!(%err, "request task did not complete");
                        state.pending_request = None;
                    },
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break interrupted;
                },
                else => break Interrupted::UserInt,
            }

            self.state_tx.send(state.clone())?;
        };

        Ok(result)
    }

    fn handle_action(
        &self,
        action: Action,
        state: &mut State,
        in_flight: &mut JoinSet<RequestOutcome>,
    ) {
        match action {
            Action::ShowJoinRoomForm => state.show_join_room_form(),
            Action::DismissNotice => state.dismiss_notice(),
            Action::CreateRoom { name } => {
                let request = match CreateRoomRequest::new(&name) {
                    Ok(request) => request,
                    Err(err) => return state.show_notice(err.to_string()),
                };
                if self.reject_while_pending(state) {
                    return;
                }

                state.mark_request_start(PendingRequest::CreateRoom);

                let client = self.client.clone();
                in_flight.spawn(async move {
                    RequestOutcome::RoomCreated(client.create_room(&request).await)
                });
            }
            Action::JoinRoom { uid, name } => {
                let request = match JoinRoomRequest::new(&uid, &name) {
                    Ok(request) => request,
                    Err(err) => return state.show_notice(err.to_string()),
                };
                if self.reject_while_pending(state) {
                    return;
                }

                state.mark_request_start(PendingRequest::JoinRoom);

                let client = self.client.clone();
                in_flight.spawn(async move {
                    let result = client.join_room(&request).await;

                    RequestOutcome::RoomJoined {
                        uid: request.uid,
                        result,
                    }
                });
            }
            Action::RefreshRoom => {
                if self.reject_while_pending(state) {
                    return;
                }

                let Some(uid) = state.room_info.as_ref().map(|room| room.uid.clone()) else {
                    debug!("no room is displayed, nothing to refresh");
                    return;
                };

                state.mark_request_start(PendingRequest::RefreshRoom);

                let client = self.client.clone();
                in_flight.spawn(async move {
                    let result = client.get_room(&uid).await;

                    RequestOutcome::RoomRefreshed { uid, result }
                });
            }
            Action::ListRooms => {
                if self.reject_while_pending(state) {
                    return;
                }

                state.mark_request_start(PendingRequest::ListRooms);

                let client = self.client.clone();
                in_flight.spawn(async move { RequestOutcome::RoomsListed(client.list_rooms().await) });
            }
            // handled by the main loop
            Action::Exit => (),
        }
    }

    // Valid submissions arriving while a request is in flight are dropped. Actions are processed in
    // order, so a double submit never reaches the room service twice.
    fn reject_while_pending(&self, state: &State) -> bool {
        if let Some(pending_request) = state.pending_request {
            debug!(?pending_request, "dropping submission while a request is in flight");
            return true;
        }

        false
    }
}
