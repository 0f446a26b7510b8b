// Infrastructure layer: process-level concerns of the binary

pub mod telemetry;

pub use telemetry::init_tracing;
