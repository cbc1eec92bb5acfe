//! High-level driver for device interaction.
//!
//! The driver layer sends commands, tracks the session mode from the
//! prompts it reads, and turns device error strings into errors.

mod builder;
mod privilege;
mod request;
pub(crate) mod response;
mod terminal;

pub use builder::SessionBuilder;
pub use privilege::PrivilegeManager;
pub use request::CommandRequest;
pub use response::Response;
pub use terminal::{DEFAULT_TIMEOUT, TerminalDriver};
