//! Authentication primitives.
//!
//! - [`jwt`] -- access-token validation and the realm role claims it carries.

pub mod jwt;
