//! Domain types: accounts, the printer, firmware, the persisted snapshot and the storage port.

pub mod account;
pub mod firmware;
pub mod ports;
pub mod printer;
pub mod state;
pub mod transaction;
