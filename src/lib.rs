pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod models;
pub mod stats;

pub use client::ApiClient;
pub use config::Config;
pub use error::TransportError;
pub use stats::DashboardStats;
