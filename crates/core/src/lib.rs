//! Domain building blocks shared by the storage and HTTP layers.
//!
//! Nothing in this crate performs I/O: it holds the error taxonomy, the id and
//! timestamp aliases, well-known role names, request validation and the
//! pagination rules.

pub mod error;
pub mod paging;
pub mod roles;
pub mod types;
pub mod validation;
