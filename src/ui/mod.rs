// UI Module
// Demo scenarios consumed by the command line shell

pub mod demo;

pub use demo::{
    deterministic_demo, probabilistic_demo, run_deterministic_demo, run_probabilistic_demo,
    DemoReport,
};
