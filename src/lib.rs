pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod notify;
pub mod server;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
