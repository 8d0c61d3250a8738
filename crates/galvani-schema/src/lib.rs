pub mod library;
pub mod template;

pub use template::CircuitTemplate;
