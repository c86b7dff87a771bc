pub mod action;
pub mod ports;
pub mod request;
pub mod status;
