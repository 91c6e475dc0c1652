use thiserror::Error;

/// Errors from rendering or saving plots.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no solved frames to plot")]
    EmptyHistory,
}
