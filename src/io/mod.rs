/// CSV telemetry and JSON summary export.
pub mod export;
