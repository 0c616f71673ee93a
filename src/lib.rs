pub mod aggregate;
pub mod buckets;
pub mod config;
pub mod export;
pub mod league;
pub mod pipeline;
pub mod predict;
pub mod standings;
pub mod tables;
