// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (JWT auth, owner-or-admin guard)

pub mod protected;
pub mod public;
pub mod validation;
