// Library root
// -----------
// This crate exposes a small library surface for the two binaries: the
// game client (`main.rs`) and the question bank manager (`trivia-admin`).
//
// Module responsibilities:
// - `api`: HTTP interactions with the quiz server (session cookie
//   handling, game endpoints, question bank management).
// - `game`: the start -> question -> answer loop and replay handling.
// - `ui`: terminal rendering and the answer/replay prompts.
// - `admin`: interactive management menu for the question bank.
// - `logging`: stderr logger behind the `log` facade.
//
// Keeping this separation makes it easier to test the game flow against
// a mock server, or to replace the terminal UI later.
pub mod admin;
pub mod api;
pub mod game;
pub mod logging;
pub mod ui;
