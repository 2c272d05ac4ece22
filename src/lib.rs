pub mod lifecycle;
pub mod linkstate;
pub mod model;
pub mod monitor;
pub mod remote;
pub mod session;
pub mod toast;
pub mod tui_shell;
