use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Rect},
    style::Color,
    Frame,
};
use tokio::sync::mpsc::UnboundedSender;

use super::super::section::{
    usage::{HasUsageInfo, UsageInfo, UsageInfoLine},
    SectionActivation,
};
use crate::state_store::{action::Action, State};
use crate::ui_management::components::{
    input_box::{self, InputBox},
    Component, ComponentRender,
};

struct Props {
    /// A request is in flight, the state store drops valid submissions until it completes
    is_request_pending: bool,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Self {
            is_request_pending: state.is_request_pending(),
        }
    }
}

/// Form asking for the display name of the participant creating a room
pub struct CreateRoomForm {
    action_tx: UnboundedSender<Action>,
    /// State Mapped CreateRoomForm Props
    props: Props,
    // Internal State for the Component
    pub name_input: InputBox,
}

impl CreateRoomForm {
    fn submit(&mut self) {
        // validation happens in the state store, an empty name ends up as a notice
        let _ = self.action_tx.send(Action::CreateRoom {
            name: String::from(self.name_input.text()),
        });
    }
}

impl Component for CreateRoomForm {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            //
            name_input: InputBox::new(state, action_tx),
        }
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        Self {
            props: Props::from(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Create Room"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            _ => self.name_input.handle_key_event(key),
        }
    }
}

impl SectionActivation for CreateRoomForm {
    fn activate(&mut self) {}

    // the typed name is kept so a failed attempt can be retried
    fn deactivate(&mut self) {}
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for CreateRoomForm {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        self.name_input.render(
            frame,
            input_box::RenderProps {
                title: "Create Room: Your Name".into(),
                area: props.area,
                border_color: props.border_color,
                show_cursor: props.show_cursor,
            },
        )
    }
}

impl HasUsageInfo for CreateRoomForm {
    fn usage_info(&self) -> UsageInfo {
        let lines = vec![
            UsageInfoLine::new(&["Esc"], "to cancel"),
            UsageInfoLine::new(&["Enter"], "to create the room"),
        ];

        UsageInfo {
            description: Some(if self.props.is_request_pending {
                "Waiting for the room service...".into()
            } else if self.name_input.is_empty() {
                "Type the name others will see you as".into()
            } else {
                "Create a new room as the first participant".into()
            }),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use tokio::sync::mpsc;

    use super::*;
    use crate::state_store::PendingRequest;

    fn press(form: &mut CreateRoomForm, code: KeyCode) {
        form.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_submits_typed_name() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut form = CreateRoomForm::new(&State::new("http://127.0.0.1:8000"), action_tx);

        for c in "Alice".chars() {
            press(&mut form, KeyCode::Char(c));
        }
        press(&mut form, KeyCode::Enter);

        assert_eq!(
            action_rx.try_recv().ok(),
            Some(Action::CreateRoom {
                name: "Alice".into()
            })
        );
    }

    #[test]
    fn test_enter_is_forwarded_while_pending() {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut state = State::new("http://127.0.0.1:8000");
        state.mark_request_start(PendingRequest::JoinRoom);
        let mut form = CreateRoomForm::new(&state, action_tx);

        // the state store decides, a blank name still has to surface as a notice
        press(&mut form, KeyCode::Enter);
        assert_eq!(
            action_rx.try_recv().ok(),
            Some(Action::CreateRoom { name: "".into() })
        );
        assert_eq!(
            form.usage_info().description.as_deref(),
            Some("Waiting for the room service...")
        );
    }
}
