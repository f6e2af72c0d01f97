use thiserror::Error;

use crate::weather::ObserverId;

/// Errors raised by the weather station and its displays.
#[derive(Debug, Error)]
pub enum StationError {
    /// The observer to remove is not subscribed to the weather data.
    #[error("observer is not registered with the weather data")]
    NotRegistered,

    /// A broadcast reached an observer that is still handling an earlier update.
    #[error("observer {0} is already handling an update")]
    ReentrantUpdate(ObserverId),

    /// A display could not write its line.
    #[error("failed to render display: {0}")]
    Render(#[from] std::io::Error),

    /// A measurement file could not be read.
    #[error("failed to read measurement data from {}: {source}", path.display())]
    ReadData {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Measurement data could not be parsed.
    #[error("invalid measurement data: {0}")]
    Data(#[from] serde_json::Error),
}
