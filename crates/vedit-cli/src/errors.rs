//! Errors that end a `vedit` run.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use vedit_checkers::RegistryError;
use vedit_config::ConfigError;
use vedit_session::SessionError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to install signal handlers: {0}")]
    Signals(io::Error),
    #[error("checker registry is inconsistent: {0}")]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
