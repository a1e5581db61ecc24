//! Outbound adapters implement the core ports against real infrastructure.

pub mod clipboard;
pub mod clock;
pub mod credentials;
pub mod llm;
pub mod telemetry;
