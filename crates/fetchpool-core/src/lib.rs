pub mod config;
pub mod logging;

pub mod fetch;
pub mod job;
pub mod pool;
pub mod retry;
pub mod url_model;
