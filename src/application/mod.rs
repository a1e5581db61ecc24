//! Application layer: the generation client and the controller that views drive.

pub mod client;
pub mod controller;

pub use client::GenerationClient;
pub use controller::GenerationController;
