pub mod refine;

pub use refine::{Refiner, RefinerConfig};
