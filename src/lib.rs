pub mod api_connection;
pub mod cli;
pub mod config;
pub mod error;
pub mod log_processor;
pub mod logging;
pub mod models;
pub mod oracle;
pub mod parser;
pub mod products;
pub mod report;
pub mod resolver;
pub mod totals;
