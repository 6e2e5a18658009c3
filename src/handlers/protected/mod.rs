// Protected handlers (JWT authentication required, routed under /api/*)
pub mod affiliate;
pub mod auth;
pub mod billing;
pub mod finance;
pub mod todo;
