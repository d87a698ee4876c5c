//! Session layer: configuration, command parsing, and the explicit session
//! context that owns the catalog for one run of the program.

pub mod command;
pub mod config;
pub mod session;

pub use command::{Command, CommandParseError, ExportScope, SearchField};
pub use config::AppConfig;
pub use session::{Outcome, Session, SessionError};
