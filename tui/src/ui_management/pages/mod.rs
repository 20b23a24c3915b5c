mod lobby_page;

pub use lobby_page::LobbyPage;
