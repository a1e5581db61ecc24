//! Inbound adapters translate external stimuli (terminal input, HTTP) into
//! `PromptService` calls.

pub mod cli;
pub mod server;
