//! Chat command front-end.
//!
//! # Responsibility
//! - Parse and validate inbound command text.
//! - Dispatch to per-command handlers that produce reply strings.
//!
//! The transport that carries text to and from a chat platform lives outside
//! this module and only needs `CommandDispatcher::dispatch`.

pub mod command;
pub mod dispatcher;
