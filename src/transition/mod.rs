//! Transition layer — single-flight variant swaps and auto-cycling.

mod controller;
mod cycle;

pub use controller::{TransitionController, TransitionOutcome};
pub use cycle::AutoCycle;
