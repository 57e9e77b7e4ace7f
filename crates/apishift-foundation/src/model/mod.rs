//! Rule-set data model.

pub mod replacement;
pub mod rules;
pub mod template;

pub use replacement::*;
pub use rules::*;
pub use template::ReplacementTemplate;
