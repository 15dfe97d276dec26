//! Pony host
//!
//! Command line front end, logging setup, pony personas and per-session state
//! around the `pony-terminal` parser.

pub mod cli;
pub mod conversation;
pub mod logging;
pub mod persona;
pub mod session;

pub use conversation::{format_response, History, Message, Role};
pub use persona::Persona;
pub use session::{LineAction, Session};
