//! Core functionalities.
mod env;
mod policy;
pub use env::{Env, Terminal};
pub use policy::{Policy, RandomPolicy};
