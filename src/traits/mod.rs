pub mod computation;
pub mod executor;
pub mod stage;

pub use computation::Computation;
pub use executor::PipelineExecutor;
pub use stage::{BuildPhase, Stage};
