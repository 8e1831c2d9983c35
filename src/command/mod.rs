//! Command pipeline
//!
//! raw line -> parser::parse -> Command -> CommandResolver::resolve -> Response
//!
//! Handlers are split by theme (intrusion, missions, maintenance, utility)
//! and all hang off `CommandResolver`.

pub mod intrusion;
pub mod maintenance;
pub mod missions;
pub mod odds;
pub mod parser;
pub mod resolver;
pub mod response;
pub mod utility;

pub use parser::{parse, Command};
pub use resolver::{CommandResolver, Verb};
pub use response::{Response, ResponseKind, ResponsePayload, ShellAction};
