pub mod config;
pub mod logging;

pub mod control;
pub mod error;
pub mod fetch;
pub mod input;
pub mod resume;
pub mod scheduler;
pub mod storage;
pub mod transfer;
pub mod url_model;
