// Utility Module
// Configuration shared by the engine and the demo shell

pub mod config;

pub use config::{CancelFlag, GeneratorConfig};
