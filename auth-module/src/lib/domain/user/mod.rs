pub mod errors;
pub mod models;
pub mod ports;
pub mod schemas;
pub mod service;
