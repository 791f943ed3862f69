pub mod bank;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod scoring;
pub mod session;
pub mod store;
