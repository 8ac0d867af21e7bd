pub mod stat_config;

pub use stat_config::StatConfig;
