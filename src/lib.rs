pub mod ansi;
pub mod app;
pub mod cli;
pub mod keybindings;
pub mod logging;
pub mod realm;
pub mod settings;
pub mod store;
pub mod tmux;
pub mod types;
pub mod ui;
