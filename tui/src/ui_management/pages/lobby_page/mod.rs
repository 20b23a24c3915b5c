mod components;
mod lobby_page;
mod section;

pub use lobby_page::LobbyPage;
