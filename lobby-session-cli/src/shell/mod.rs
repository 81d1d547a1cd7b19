//! Line-oriented lobby shell: command parsing and rendering.

mod command;
mod render;

pub use command::{ShellCommand, HELP};
pub use render::{render_lobbies, render_lobby, render_status};
