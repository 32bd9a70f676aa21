//! Application layer: the ATM orchestrator that applies business rules to the domain and
//! persists every mutation through the storage port.

pub mod machine;
