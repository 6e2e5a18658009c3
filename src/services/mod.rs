pub mod stats_service;
pub mod sync;
