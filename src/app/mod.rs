//! Application layer containing the services that consume capabilities.

pub mod service;

pub use service::AppService;
