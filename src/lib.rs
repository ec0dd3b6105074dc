pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod hub;
pub mod ledger;

pub use api::AppState;
pub use config::Config;
