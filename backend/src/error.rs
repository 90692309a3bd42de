use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    OpenCV(#[from] opencv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("device produced no readiness token within {0:?}")]
    DeviceUnresponsive(Duration),
    #[error("serial link closed by the device")]
    LinkClosed,
}
