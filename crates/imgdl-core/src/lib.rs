pub mod config;
pub mod logging;

pub mod control;
pub mod fetcher;
pub mod report;
pub mod resolver;
pub mod scheduler;
pub mod storage;
pub mod task;
pub mod url_model;
