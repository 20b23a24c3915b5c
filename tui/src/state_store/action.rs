#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateRoom { name: String },
    ShowJoinRoomForm,
    JoinRoom { uid: String, name: String },
    RefreshRoom,
    ListRooms,
    DismissNotice,
    Exit,
}
