pub mod derive;
pub mod outcome;
pub mod verify;

pub use derive::derive;
pub use outcome::{Derivation, Discrepancy, Reconciliation};
pub use verify::verify;
