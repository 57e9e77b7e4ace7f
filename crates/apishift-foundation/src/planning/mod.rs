//! Planning types shared between the syntax passes and the edit applier.

pub mod edit;

pub use edit::*;
