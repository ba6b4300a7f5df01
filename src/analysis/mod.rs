pub mod aggregator;
pub mod insights;

pub use aggregator::aggregate;
pub use insights::{render_template, InsightGenerator};
