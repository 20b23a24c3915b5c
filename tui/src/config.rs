use std::path::PathBuf;

use clap::Parser;
use comms::transport::client::DEFAULT_SERVER_URL;

/// Terminal client for creating and joining rooms
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base url of the room service
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// File to write logs to, the terminal itself is taken by the ui
    #[arg(long, default_value = "room-lobby.log")]
    pub log_file: PathBuf,
}
