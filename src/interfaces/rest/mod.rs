pub mod models;
pub mod request_builder;
