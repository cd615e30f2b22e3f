mod aggregator;
mod resources;

pub use aggregator::HealthAggregator;
pub use resources::{ResourceSampler, SystemResourceSampler};
