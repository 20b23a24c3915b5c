use clap::Parser;
use comms::transport::client::RoomClient;
use state_store::StateStore;
use termination::{create_termination, Interrupted};
use tracing::info;
use ui_management::UiManager;

mod config;
mod logging;
mod state_store;
mod termination;
mod ui_management;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = config::Args::parse();
    logging::init(&args.log_file)?;

    let client = RoomClient::new(&args.server_url)?;
    info!(server_url = %client.base_url(), "starting room lobby");

    let (terminator, mut interrupt_rx) = create_termination();
    let (state_store, state_rx) = StateStore::new(client);
    let (ui_manager, action_rx) = UiManager::new();

    tokio::try_join!(
        state_store.main_loop(terminator, action_rx, interrupt_rx.resubscribe()),
        ui_manager.main_loop(state_rx, interrupt_rx.resubscribe()),
    )?;

    match interrupt_rx.recv().await {
        Ok(Interrupted::UserInt) => info!("exited per user request"),
        Ok(Interrupted::OsSigInt) => info!("exited because of an os sig int"),
        Err(err) => info!(%err, "exited without an interrupt"),
    }

    Ok(())
}
