/// Result alias used across the library.
pub type YardResult<T> = Result<T, YardError>;

/// Library error type.
///
/// Per-item failures in the batch tools are reported through their summaries instead of this
/// type; `YardError` is what aborts a whole run.
#[derive(thiserror::Error, Debug)]
pub enum YardError {
    /// Input failed validation (bad config, bad flags, bad items JSON).
    #[error("validation error: {0}")]
    Validation(String),

    /// A config file could not be located or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Image decode/encode or rasterization failure.
    #[error("image error: {0}")]
    Image(String),

    /// External encoder (`ffmpeg`) failure.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// Spreadsheet read/write failure.
    #[error("spreadsheet error: {0}")]
    Sheet(String),

    /// HTTP request failure.
    #[error("http error: {0}")]
    Http(String),

    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything carrying an `anyhow` context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl YardError {
    /// Build a [`YardError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`YardError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`YardError::Image`].
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`YardError::Encoder`].
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Build a [`YardError::Sheet`].
    pub fn sheet(msg: impl Into<String>) -> Self {
        Self::Sheet(msg.into())
    }

    /// Build a [`YardError::Http`].
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

impl From<image::ImageError> for YardError {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            YardError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(YardError::config("x").to_string().contains("config error:"));
        assert!(YardError::image("x").to_string().contains("image error:"));
        assert!(
            YardError::encoder("x")
                .to_string()
                .contains("encoder error:")
        );
        assert!(
            YardError::sheet("x")
                .to_string()
                .contains("spreadsheet error:")
        );
        assert!(YardError::http("x").to_string().contains("http error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = YardError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
