pub mod pipeline;

pub use pipeline::{admission_middleware, AdmissionPipeline, Gate, GateOutcome};
