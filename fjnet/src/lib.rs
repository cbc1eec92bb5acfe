//! # fjnet
//!
//! Async CLI automation for Fujitsu Si-R routers, SR-S switches and
//! IPCOM appliances.
//!
//! The crate is layered the way the devices are driven:
//!
//! - [`transport`]: an SSH shell (or a scripted replay) that reads until
//!   a prompt pattern appears
//! - [`driver`]: prompt tracking, privilege changes and device error
//!   detection
//! - [`cliconf`]: `get`, `get_config`, `edit_config` and the capability
//!   document
//! - [`facts`] and [`modules`]: the `command`, `config` and `facts`
//!   actions
//!
//! Each family is a data-only [`PlatformDefinition`] selected by
//! [`Platform`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fjnet::{Connection, Platform, SessionBuilder};
//! use fjnet::driver::CommandRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), fjnet::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .platform(Platform::FujitsuSir)
//!         .authorize(true)
//!         .connect()
//!         .await?;
//!
//!     let output = session.get(&CommandRequest::new("show system information")).await?;
//!     println!("{}", output);
//!
//!     session.close().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod cliconf;
pub mod driver;
pub mod error;
pub mod facts;
pub mod modules;
pub mod platform;
pub mod transport;

pub use cliconf::{Cliconf, Connection, EditOptions, EditResult};
pub use driver::{CommandRequest, Response, SessionBuilder, TerminalDriver};
pub use error::{Error, Result};
pub use platform::{Platform, PlatformDefinition, SessionMode};
pub use transport::{AuthMethod, ScriptedTransport, SshConfig};
