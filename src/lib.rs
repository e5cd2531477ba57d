// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod history;
pub mod matcher;
pub mod metrics;
pub mod queue;
pub mod runtime;
pub mod session;
pub mod ui;
pub mod word;
