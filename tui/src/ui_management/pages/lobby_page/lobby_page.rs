use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{prelude::*, widgets::*, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::state_store::{action::Action, PendingRequest, RoomInfo, State};

use super::{
    components::{
        create_room_form::{self, CreateRoomForm},
        join_room_form::{self, JoinRoomForm},
    },
    section::{
        usage::{widget_usage_to_text, HasUsageInfo, UsageInfo, UsageInfoLine},
        SectionActivation,
    },
};
use crate::ui_management::components::{Component, ComponentRender};

#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    CreateRoom,
    JoinRoom,
}

struct Props {
    server_url: String,
    room_info: Option<RoomInfo>,
    join_form_visible: bool,
    room_not_found_visible: bool,
    room_directory: Option<Vec<RoomInfo>>,
    notice: Option<String>,
    pending_request: Option<PendingRequest>,
}

impl From<&State> for Props {
    fn from(state: &State) -> Self {
        Props {
            server_url: state.server_url.clone(),
            room_info: state.room_info.clone(),
            join_form_visible: state.join_form_visible,
            room_not_found_visible: state.room_not_found_visible,
            room_directory: state.room_directory.clone(),
            notice: state.notice.clone(),
            pending_request: state.pending_request,
        }
    }
}

const DEFAULT_HOVERED_SECTION: Section = Section::CreateRoom;

/// LobbyPage is the only page of the client: creating a room, joining one and inspecting the result
pub struct LobbyPage {
    /// Action sender
    pub action_tx: UnboundedSender<Action>,
    /// State Mapped LobbyPage Props
    props: Props,
    // Internal State
    /// Currently active section, handling input
    pub active_section: Option<Section>,
    /// Section that is currently hovered
    pub last_hovered_section: Section,
    // Child Components
    pub create_room_form: CreateRoomForm,
    pub join_room_form: JoinRoomForm,
}

impl LobbyPage {
    fn get_component_for_section<'a>(&'a self, section: &Section) -> &'a dyn Component {
        match section {
            Section::CreateRoom => &self.create_room_form,
            Section::JoinRoom => &self.join_room_form,
        }
    }

    fn get_component_for_section_mut<'a>(&'a mut self, section: &Section) -> &'a mut dyn Component {
        match section {
            Section::CreateRoom => &mut self.create_room_form,
            Section::JoinRoom => &mut self.join_room_form,
        }
    }

    fn get_section_activation_for_section<'a>(
        &'a mut self,
        section: &Section,
    ) -> &'a mut dyn SectionActivation {
        match section {
            Section::CreateRoom => &mut self.create_room_form,
            Section::JoinRoom => &mut self.join_room_form,
        }
    }

    fn is_section_visible(&self, section: &Section) -> bool {
        match section {
            Section::CreateRoom => true,
            Section::JoinRoom => self.props.join_form_visible,
        }
    }

    // only two sections exist, hovering in either direction flips between them
    fn hover_other(&mut self) {
        let other = match self.last_hovered_section {
            Section::CreateRoom => Section::JoinRoom,
            Section::JoinRoom => Section::CreateRoom,
        };

        if self.is_section_visible(&other) {
            self.last_hovered_section = other;
        }
    }

    fn activate_hovered_section(&mut self) {
        let last_hovered_section = self.last_hovered_section.clone();
        if !self.is_section_visible(&last_hovered_section) {
            return;
        }

        self.active_section = Some(last_hovered_section.clone());
        self.get_section_activation_for_section(&last_hovered_section)
            .activate();
    }

    fn calculate_border_color(&self, section: Section) -> Color {
        match (self.active_section.as_ref(), &self.last_hovered_section) {
            (Some(active_section), _) if active_section.eq(&section) => Color::Yellow,
            (_, last_hovered_section) if last_hovered_section.eq(&section) => Color::Blue,
            _ => Color::Reset,
        }
    }

    fn disable_section(&mut self, section: &Section) {
        self.get_section_activation_for_section(section)
            .deactivate();

        self.active_section = None;
    }

    fn send(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }
}

impl Component for LobbyPage {
    fn new(state: &State, action_tx: UnboundedSender<Action>) -> Self
    where
        Self: Sized,
    {
        LobbyPage {
            action_tx: action_tx.clone(),
            // set the props
            props: Props::from(state),
            // internal component state
            active_section: Option::None,
            last_hovered_section: DEFAULT_HOVERED_SECTION,
            // child components
            create_room_form: CreateRoomForm::new(state, action_tx.clone()),
            join_room_form: JoinRoomForm::new(state, action_tx),
        }
        .move_with_state(state)
    }

    fn move_with_state(self, state: &State) -> Self
    where
        Self: Sized,
    {
        LobbyPage {
            props: Props::from(state),
            // propogate the update to the child components
            create_room_form: self.create_room_form.move_with_state(state),
            join_room_form: self.join_room_form.move_with_state(state),
            ..self
        }
    }

    fn name(&self) -> &str {
        "Lobby Page"
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // a notice swallows every key until it is dismissed
        if self.props.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.send(Action::DismissNotice);
            }
            return;
        }

        // raw mode turns Ctrl-C into a key press, it exits even while a form is being edited
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.send(Action::Exit);
        }

        let active_section = self.active_section.clone();

        match active_section {
            None => match key.code {
                KeyCode::Char('e') => self.activate_hovered_section(),
                KeyCode::Left | KeyCode::Right => self.hover_other(),
                KeyCode::Char('j') => {
                    self.send(Action::ShowJoinRoomForm);
                    self.last_hovered_section = Section::JoinRoom;
                }
                KeyCode::Char('r') if self.props.room_info.is_some() => {
                    self.send(Action::RefreshRoom)
                }
                KeyCode::Char('l') => self.send(Action::ListRooms),
                KeyCode::Char('q') => self.send(Action::Exit),
                _ => {}
            },
            Some(section) => {
                if key.code == KeyCode::Esc {
                    self.disable_section(&section);
                } else {
                    self.get_component_for_section_mut(&section)
                        .handle_key_event(key);
                }
            }
        }
    }
}

const ROOM_NOT_FOUND_MESSAGE: &str = "Room not found. Check the UID and try again.";

fn centered_rect(width_percent: u16, height: u16, area: Rect) -> Rect {
    let [_, vertical_centered, _] = *Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(0),
                Constraint::Length(height),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area)
    else {
        panic!("The vertical popup layout should have 3 chunks")
    };

    let side = (100 - width_percent) / 2;
    let [_, both_centered, _] = *Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(side),
                Constraint::Percentage(width_percent),
                Constraint::Percentage(side),
            ]
            .as_ref(),
        )
        .split(vertical_centered)
    else {
        panic!("The horizontal popup layout should have 3 chunks")
    };

    both_centered
}

impl LobbyPage {
    fn render_header<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let status = match self.props.pending_request {
            Some(pending_request) => Span::from(pending_request.description()).italic(),
            None => Span::from("Idle"),
        };

        let header = Paragraph::new(Line::from(vec![
            "Server: ".into(),
            Span::from(self.props.server_url.clone()).bold(),
            " | ".into(),
            status,
        ]))
        .block(Block::default().borders(Borders::ALL).title("Room Lobby"));
        frame.render_widget(header, area);
    }

    fn render_room_info<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        // the panel only exists once there is a room to show
        let Some(room_info) = self.props.room_info.as_ref() else {
            return;
        };

        let mut lines = vec![
            Line::from(vec!["Room UID: ".into(), Span::from(room_info.uid.clone()).bold()]),
            Line::from(format!("Participants ({}):", room_info.participants.len())),
        ];
        lines.extend(
            room_info
                .participants
                .iter()
                .map(|participant| Line::from(format!("  @{}", participant))),
        );

        let panel = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Room Information"),
            );
        frame.render_widget(panel, area);
    }

    fn render_room_directory<B: Backend>(&self, frame: &mut Frame<B>, area: Rect) {
        let items = match self.props.room_directory.as_ref() {
            Some(rooms) if rooms.is_empty() => vec![ListItem::new(Line::from("No rooms yet"))],
            Some(rooms) => rooms
                .iter()
                .map(|room| {
                    ListItem::new(Line::from(format!(
                        "{} ({})",
                        room.uid,
                        room.participants.len()
                    )))
                })
                .collect::<Vec<ListItem>>(),
            None => vec![ListItem::new(Line::from(
                Span::from("Press (l) to list rooms").italic(),
            ))],
        };

        let directory =
            List::new(items).block(Block::default().borders(Borders::ALL).title("Rooms"));
        frame.render_widget(directory, area);
    }

    fn render_notice<B: Backend>(&self, frame: &mut Frame<B>) {
        let Some(notice) = self.props.notice.as_ref() else {
            return;
        };

        let area = centered_rect(50, 5, frame.size());
        let popup = Paragraph::new(Text::from(vec![
            Line::from(Span::from(notice.clone()).bold()),
            Line::from(vec!["Press ".into(), "<Enter>".bold(), " to close.".into()]),
        ]))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .fg(Color::Yellow)
                .title("Notice"),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(popup, area);
    }
}

impl ComponentRender<()> for LobbyPage {
    fn render<B: Backend>(&self, frame: &mut Frame<B>, _props: ()) {
        let [left, right] = *Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
            .split(frame.size())
        else {
            panic!("The main layout should have 2 chunks")
        };

        let join_height = if self.props.join_form_visible { 6 } else { 3 };
        let banner_height = if self.props.room_not_found_visible { 3 } else { 0 };
        let [container_header, container_create, container_join, container_banner, container_room_info] =
            *Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(join_height),
                        Constraint::Length(banner_height),
                        Constraint::Min(1),
                    ]
                    .as_ref(),
                )
                .split(left)
        else {
            panic!("The left layout should have 5 chunks")
        };

        self.render_header(frame, container_header);

        self.create_room_form.render(
            frame,
            create_room_form::RenderProps {
                area: container_create,
                border_color: self.calculate_border_color(Section::CreateRoom),
                show_cursor: self.active_section == Some(Section::CreateRoom),
            },
        );

        if self.props.join_form_visible {
            self.join_room_form.render(
                frame,
                join_room_form::RenderProps {
                    area: container_join,
                    border_color: self.calculate_border_color(Section::JoinRoom),
                    show_cursor: self.active_section == Some(Section::JoinRoom),
                },
            );
        } else {
            let hint = Paragraph::new(Line::from(vec![
                "Press ".into(),
                "(j)".bold(),
                " to join an existing room.".into(),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Join Room"));
            frame.render_widget(hint, container_join);
        }

        if self.props.room_not_found_visible {
            let banner = Paragraph::new(Line::from(Span::from(ROOM_NOT_FOUND_MESSAGE).bold()))
                .style(Style::default().fg(Color::Red))
                .block(Block::default().borders(Borders::ALL).title("Error"));
            frame.render_widget(banner, container_banner);
        }

        self.render_room_info(frame, container_room_info);

        let [container_directory, container_usage] = *Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(10)].as_ref())
            .split(right)
        else {
            panic!("The right layout should have 2 chunks")
        };

        self.render_room_directory(frame, container_directory);

        let usage = Paragraph::new(widget_usage_to_text(self.usage_info()))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Usage"));
        frame.render_widget(usage, container_usage);

        // drawn last so it covers everything else
        self.render_notice(frame);
    }
}

impl HasUsageInfo for LobbyPage {
    fn usage_info(&self) -> UsageInfo {
        if self.props.notice.is_some() {
            return UsageInfo {
                description: Some("Read the notice first".into()),
                lines: vec![UsageInfoLine::new(&["Enter", "Esc"], "to close it")],
            };
        }

        if let Some(section) = self.active_section.as_ref() {
            let handler: &dyn HasUsageInfo = match section {
                Section::CreateRoom => &self.create_room_form,
                Section::JoinRoom => &self.join_room_form,
            };

            return handler.usage_info();
        }

        let mut lines = vec![
            UsageInfoLine::new(&["q"], "to exit"),
            UsageInfoLine::new(&["←", "→"], "to hover widgets"),
            UsageInfoLine::new(
                &["e"],
                format!(
                    "to activate {}",
                    self.get_component_for_section(&self.last_hovered_section)
                        .name()
                ),
            ),
        ];
        if !self.props.join_form_visible {
            lines.push(UsageInfoLine::new(&["j"], "to join an existing room"));
        }
        if self.props.room_info.is_some() {
            lines.push(UsageInfoLine::new(&["r"], "to refresh the room"));
        }
        lines.push(UsageInfoLine::new(&["l"], "to list rooms"));

        UsageInfo {
            description: Some("Select a widget".into()),
            lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;

    fn page(state: &State) -> (LobbyPage, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (LobbyPage::new(state, action_tx), action_rx)
    }

    fn press(page: &mut LobbyPage, code: KeyCode) {
        page.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(page: &mut LobbyPage, text: &str) {
        for c in text.chars() {
            press(page, KeyCode::Char(c));
        }
    }

    fn render_to_string(page: &LobbyPage) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|frame| page.render(frame, ())).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol.as_str())
            .collect()
    }

    #[test]
    fn test_create_flow_sends_action() {
        let (mut page, mut action_rx) = page(&State::new("http://127.0.0.1:8000"));

        press(&mut page, KeyCode::Char('e'));
        type_text(&mut page, "Alice");
        press(&mut page, KeyCode::Enter);

        assert_eq!(
            action_rx.try_recv().ok(),
            Some(Action::CreateRoom {
                name: "Alice".into()
            })
        );
    }

    #[test]
    fn test_join_form_is_reachable_once_visible() {
        let mut state = State::new("http://127.0.0.1:8000");
        let (mut page, mut action_rx) = page(&state);

        // hidden join form can not be hovered
        press(&mut page, KeyCode::Right);
        assert_eq!(page.last_hovered_section, Section::CreateRoom);

        press(&mut page, KeyCode::Char('j'));
        assert_eq!(action_rx.try_recv().ok(), Some(Action::ShowJoinRoomForm));

        state.show_join_room_form();
        let mut page = page.move_with_state(&state);
        press(&mut page, KeyCode::Char('e'));
        type_text(&mut page, "ABC123");
        press(&mut page, KeyCode::Tab);
        type_text(&mut page, "Bob");
        press(&mut page, KeyCode::Enter);

        assert_eq!(
            action_rx.try_recv().ok(),
            Some(Action::JoinRoom {
                uid: "ABC123".into(),
                name: "Bob".into(),
            })
        );
    }

    #[test]
    fn test_notice_blocks_other_keys() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.show_notice("Please enter your name");
        let (mut page, mut action_rx) = page(&state);

        press(&mut page, KeyCode::Char('q'));
        press(&mut page, KeyCode::Char('e'));
        press(&mut page, KeyCode::Char('l'));
        assert!(action_rx.try_recv().is_err());
        assert_eq!(page.active_section, None);

        press(&mut page, KeyCode::Enter);
        assert_eq!(action_rx.try_recv().ok(), Some(Action::DismissNotice));
    }

    #[test]
    fn test_ctrl_c_exits_from_an_active_form() {
        let (mut page, mut action_rx) = page(&State::new("http://127.0.0.1:8000"));

        press(&mut page, KeyCode::Char('e'));
        type_text(&mut page, "Al");
        page.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action_rx.try_recv().ok(), Some(Action::Exit));

        // nothing was typed into the name
        press(&mut page, KeyCode::Enter);
        assert_eq!(
            action_rx.try_recv().ok(),
            Some(Action::CreateRoom { name: "Al".into() })
        );
    }

    #[test]
    fn test_refresh_needs_a_room() {
        let mut state = State::new("http://127.0.0.1:8000");
        let (mut page, mut action_rx) = page(&state);

        press(&mut page, KeyCode::Char('r'));
        assert!(action_rx.try_recv().is_err());

        state.room_info = Some(RoomInfo {
            uid: "ABC123".into(),
            participants: vec!["Alice".into()],
        });
        let mut page = page.move_with_state(&state);
        press(&mut page, KeyCode::Char('r'));
        assert_eq!(action_rx.try_recv().ok(), Some(Action::RefreshRoom));
    }

    #[test]
    fn test_render_reveals_room_info_and_error() {
        let mut state = State::new("http://127.0.0.1:8000");
        let (page, _action_rx) = page(&state);

        let screen = render_to_string(&page);
        assert!(!screen.contains("Room UID"));
        assert!(!screen.contains("Room not found"));

        state.room_info = Some(RoomInfo {
            uid: "ABC123".into(),
            participants: vec!["Alice".into()],
        });
        state.room_not_found_visible = true;
        let page = page.move_with_state(&state);

        let screen = render_to_string(&page);
        assert!(screen.contains("ABC123"));
        assert!(screen.contains("@Alice"));
        assert!(screen.contains("Room not found"));
    }

    #[test]
    fn test_render_notice() {
        let mut state = State::new("http://127.0.0.1:8000");
        state.show_notice("Please enter your name and UID");
        let (page, _action_rx) = page(&state);

        let screen = render_to_string(&page);
        assert!(screen.contains("Please enter your name and UID"));
    }
}
