pub mod check;

pub use check::{check_constraints, check_constraints_with, ValidatorConfig};
