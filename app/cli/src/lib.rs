//! The quorum CLI: argument parsing, config resolution, and the
//! interactive surfaces around the agent/team cores.

pub use cmd::Cli;
pub use config::AppConfig;
pub use session::Session;

pub mod cmd;
pub mod config;
pub mod gateway;
pub mod repl;
pub mod session;
