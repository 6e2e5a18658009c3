// Two security tiers: public (no auth, /auth/*) and protected (JWT, /api/*)
pub mod protected;
pub mod public;
