// Library module for specular
// Re-exports modules for use in integration tests and external crates

pub mod cli;
pub mod logging;
pub mod sync;
