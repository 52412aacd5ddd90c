// Entrypoint for the game client.
// - Keeps `main` small: create an API client and hand it to the game loop.
// - Returns `anyhow::Result`, so a failed start exits non-zero with the
//   underlying cause printed.

use trivia_cli::{api::ApiClient, game, logging, ui::Console};

fn main() -> anyhow::Result<()> {
    logging::init();

    // Base URL comes from `TRIVIA_API_URL` or defaults to the local
    // development server. See `api::ApiClient::from_env`.
    let mut api = ApiClient::from_env()?;
    let mut console = Console::stdio();

    // Blocks until the operator declines a replay.
    game::play(&mut api, &mut console)
}
