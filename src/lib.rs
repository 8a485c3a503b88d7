pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod error;
pub mod logger;
pub mod reconcile;
pub mod scanner;
pub mod types;
