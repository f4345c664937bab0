//! Well-known role name constants.
//!
//! These must match the role claim issued by the identity provider.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_REVIEWER: &str = "reviewer";
pub const ROLE_ANALYST: &str = "analyst";
