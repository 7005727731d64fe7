pub mod config;
pub mod logging;

pub mod archive;
pub mod batch;
pub mod delay;
pub mod error;
pub mod fetcher;
pub mod item;
pub mod naming;
pub mod orchestrator;
pub mod progress;
pub mod provider;
pub mod retry;
