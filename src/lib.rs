//! Client for IEC 61499 FORTE runtimes.
//!
//! The runtime's management interface speaks length-prefixed XML over TCP.
//! This crate provides the frame codec ([`frame`]), request construction
//! ([`command`]), a blocking request/response [`session`], load-script
//! execution ([`script`]), canned deployment plans ([`deploy`]) and the
//! command-line front end ([`cli`]).
//!
//! ```no_run
//! use forte_client::{
//!     command::{Action, Params},
//!     session::{Session, SessionConfig},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(SessionConfig::default());
//! session.connect()?;
//! let response = session.send(&Action::Query, &Params::new())?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod command;
pub mod deploy;
pub mod frame;
pub mod script;
pub mod session;

#[cfg(test)]
mod test_helpers;
