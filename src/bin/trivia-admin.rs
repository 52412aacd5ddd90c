// Entrypoint for the question bank management client.
// Same configuration as the game client, different interaction surface.

use trivia_cli::{admin::main_menu, api::ApiClient, logging};

fn main() -> anyhow::Result<()> {
    logging::init();
    let api = ApiClient::from_env()?;
    main_menu(api)?;
    Ok(())
}
