pub mod report;
pub mod status;
pub mod store;
pub mod value;

pub use report::{ConstraintReport, NextAction, RefinementReport, SizingChange, SizingReport};
pub use status::DesignStatus;
pub use store::{DesignState, DesignStore, HistoryEntry, StateUpdate};
pub use value::{ConstraintMap, MetricsMap, SizingMap, Value};
