use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    prelude::{Backend, Constraint, Direction, Layout, Rect},
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

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Uid,
    Name,
}

impl Field {
    fn other(&self) -> Field {
        match self {
            Field::Uid => Field::Name,
            Field::Name => Field::Uid,
        }
    }
}

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

/// Form asking for the uid of an existing room and the display name to join it with
pub struct JoinRoomForm {
    action_tx: UnboundedSender<Action>,
    /// State Mapped JoinRoomForm Props
    props: Props,
    // Internal State for the Component
    focused_field: Field,
    pub uid_input: InputBox,
    pub name_input: InputBox,
}

impl JoinRoomForm {
    fn submit(&mut self) {
        let _ = self.action_tx.send(Action::JoinRoom {
            uid: String::from(self.uid_input.text()),
            name: String::from(self.name_input.text()),
        });
    }

    fn focused_input_mut(&mut self) -> &mut InputBox {
        match self.focused_field {
            Field::Uid => &mut self.uid_input,
            Field::Name => &mut self.name_input,
        }
    }
}

impl Component for JoinRoomForm {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self {
        Self {
            action_tx: action_tx.clone(),
            props: Props::from(state),
            //
            focused_field: Field::Uid,
            uid_input: InputBox::new(state, action_tx.clone()),
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
        "Join Room"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focused_field = self.focused_field.other();
            }
            _ => self.focused_input_mut().handle_key_event(key),
        }
    }
}

impl SectionActivation for JoinRoomForm {
    fn activate(&mut self) {
        self.focused_field = Field::Uid;
    }

    fn deactivate(&mut self) {}
}

pub struct RenderProps {
    pub area: Rect,
    pub border_color: Color,
    pub show_cursor: bool,
}

impl ComponentRender<RenderProps> for JoinRoomForm {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, props: RenderProps) {
        let [container_uid, container_name] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)].as_ref())
            .split(props.area)
        else {
            panic!("The join form layout should have 2 chunks")
        };

        self.uid_input.render(
            frame,
            input_box::RenderProps {
                title: "Join Room: Room UID".into(),
                area: container_uid,
                border_color: props.border_color,
                show_cursor: props.show_cursor && self.focused_field == Field::Uid,
            },
        );
        self.name_input.render(
            frame,
            input_box::RenderProps {
                title: "Join Room: Your Name".into(),
                area: container_name,
                border_color: props.border_color,
                show_cursor: props.show_cursor && self.focused_field == Field::Name,
            },
        );
    }
}

impl HasUsageInfo for JoinRoomForm {
    fn usage_info(&self) -> UsageInfo {
        let lines = vec![
            UsageInfoLine::new(&["Esc"], "to cancel"),
            UsageInfoLine::new(&["Tab", "↑", "↓"], "to switch fields"),
            UsageInfoLine::new(&["Enter"], "to join the room"),
        ];

        UsageInfo {
            description: Some(if self.props.is_request_pending {
                "Waiting for the room service...".into()
            } else {
                "Enter the UID you were given and your name".into()
            }),
            lines,
        }
    }
}
