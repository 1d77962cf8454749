pub mod evaluator;
pub mod level;

pub use evaluator::{TrafficAssessment, TrafficEvaluator};
pub use level::TrafficLevel;
