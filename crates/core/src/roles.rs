//! Well-known realm role names carried in the `realm_access.roles` token claim.

pub const ROLE_ADMIN: &str = "IDM_ADMIN";
pub const ROLE_USER: &str = "IDM_USER";
