pub mod annotations;
pub mod calls;
pub mod composition;
pub mod effects;
pub mod enum_registry;
pub mod error_codes;
pub mod errors;
pub mod escape;
pub mod hierarchy;
pub mod mutation;
