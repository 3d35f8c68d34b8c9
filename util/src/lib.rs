pub mod config;
pub mod constants;
pub mod notify;
pub mod rate_limit;
pub mod state;
pub mod tasks;
