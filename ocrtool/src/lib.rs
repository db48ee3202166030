pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod ocr;
pub mod resolver;
pub mod rpc;
