pub mod cli;
pub mod config;
pub mod http;
pub mod log;

pub use crate::http::{Command, CommandKind, NodeClient, NodeError};
