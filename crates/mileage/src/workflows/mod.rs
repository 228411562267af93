pub mod odometer;
pub mod triplog;
