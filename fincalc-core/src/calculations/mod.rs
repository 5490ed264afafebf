//! Calculators for Egyptian taxes, contributions and personal finance.
//!
//! Every calculator is a plain function from its parameter record (plus
//! the rate tables where a year applies) to a [`Report`](crate::Report).
//! Only feasibility, retirement and loan can fail.

pub mod brackets;
pub mod business;
pub mod common;
pub mod electricity;
pub mod error;
pub mod income;
pub mod inheritance;
pub mod insurance;
pub mod planning;
pub mod property;
pub mod zakat;

pub use brackets::{BracketBreakdown, BracketSlice, apply_brackets};
pub use error::CalculationError;
pub use inheritance::{HeirShare, InheritanceDistribution};
pub use insurance::Contributions;
