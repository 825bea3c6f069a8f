//! Ability ledger use cases: spending charges and rest restoration.

pub mod error;
pub mod rest;
pub mod use_charge;

pub use error::AbilityError;
pub use rest::{RestOutcome, TakeRest};
pub use use_charge::{ChargeSpent, UseCharge};
