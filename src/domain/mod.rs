//! Domain layer types and invariants.

pub mod assigns;
pub mod component;
pub mod error;
pub mod library;
pub mod naming;
pub mod outcome;
