pub mod auth;
pub mod hitl;
pub mod rbac;
