pub mod access;
pub mod gate;

pub use gate::{AuthGate, AuthRequirement, Decision, requirement};
