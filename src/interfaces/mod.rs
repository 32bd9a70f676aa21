//! Adapters that face the outside world: the interactive console and CSV exports.

pub mod console;
pub mod csv;
