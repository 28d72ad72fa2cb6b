// core.rs splits the ledger into the chain itself and the audit walk over it.
pub mod chain;
pub mod validation;

pub use chain::*;
pub use validation::*;
