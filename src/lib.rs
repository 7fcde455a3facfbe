pub mod api;
pub mod app;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod models;
pub mod report;
pub mod screens;
pub mod session;
pub mod toast;
pub mod validation;
