/// Crate-wide result alias.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Errors surfaced by the timeline engine.
///
/// Image load failures are produced by loaders but never escape [`crate::ImageCache`]; they
/// degrade the affected frame to the placeholder render instead.
#[derive(thiserror::Error, Debug)]
pub enum TimelineError {
    /// Invalid configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The frame feed could not be fetched or parsed.
    #[error("feed load error: {0}")]
    FeedLoad(String),

    /// A frame image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// A drawing surface rejected an operation.
    #[error("render error: {0}")]
    Render(String),

    /// Video generation failed or was cancelled.
    #[error("export error: {0}")]
    Export(String),

    /// Context-wrapped I/O and third-party failures.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimelineError {
    /// Build a [`TimelineError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TimelineError::FeedLoad`].
    pub fn feed_load(msg: impl Into<String>) -> Self {
        Self::FeedLoad(msg.into())
    }

    /// Build a [`TimelineError::ImageLoad`].
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`TimelineError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TimelineError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
