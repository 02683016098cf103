//! Allocation engine: pipeline orchestration, session splitting, data
//! source injection and quality metrics.

mod kpi;
mod pipeline;
mod source;

pub use kpi::{AllocationKpi, RoomDiversity};
pub use pipeline::{AllocationOutcome, AllocationRequest, SeatingEngine, SessionOutcome};
pub use source::{InMemorySource, SeatingSource};
