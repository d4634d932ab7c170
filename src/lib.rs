// Library for tests to access modules

pub mod cache;
pub mod collectors;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod sampler;
pub mod status;
