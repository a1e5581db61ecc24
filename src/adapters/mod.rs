pub mod inbound;
pub mod outbound;

// Re-export commonly used adapters at the adapters level
pub use inbound::{cli::CliAdapter, server::ServerAdapter};
pub use outbound::llm::RigCompletionBackend;
