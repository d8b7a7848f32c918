pub mod auth;
pub mod config;
pub mod contract;
pub mod issues;
pub mod plan;
pub mod readme;
pub mod validate;
