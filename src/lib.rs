pub mod app;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod job;
pub mod projection;
pub mod refresh;
pub mod shutdown;
pub mod source;
pub mod store;
