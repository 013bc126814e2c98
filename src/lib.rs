pub mod changes;
pub mod logging;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod session;
pub mod settings;
pub mod tui;

mod tui_shell;
