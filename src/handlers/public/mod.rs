// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus the home and health routes.

pub mod auth;
pub mod home;
