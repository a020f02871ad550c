// Infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod telemetry;

// Domain
pub mod channel;
pub mod command;
pub mod pipeline;
pub mod recipient;

// Application
pub mod dispatcher;
