pub mod collaborators;
pub mod orchestrate;
pub mod select;
pub mod simulate;
pub mod size;
pub mod stages;

pub use collaborators::{Simulator, Sizer, TopologySelector};
pub use orchestrate::DesignLoop;
pub use select::KeywordSelector;
pub use simulate::AnalyticSimulator;
pub use size::FirstOrderSizer;
