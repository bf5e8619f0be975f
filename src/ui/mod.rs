//! Terminal UI for playing a match against a friend or the computer.

mod app;
mod game_view;

pub use app::App;
