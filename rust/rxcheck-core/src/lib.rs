//! rxcheck Core
//!
//! The declaration model handed to the checker by a front end: spans, static
//! types, effect levels, and the program table (functions, classes, enum
//! classes, and the call / mutation / allocation sites inside function bodies).

pub mod effect;
pub mod program;
pub mod span;
pub mod types;

pub use effect::EffectLevel;
pub use program::Program;
pub use span::Span;
pub use types::Ty;
