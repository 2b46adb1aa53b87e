pub type Result<T> = std::result::Result<T, SlideError>;

#[derive(thiserror::Error, Debug)]
pub enum SlideError {
    #[error("theme registry is missing the default theme `{0}`")]
    MissingDefaultTheme(String),

    #[error("invalid aspect ratio `{0}` (expected 16:9, 4:3 or 1:1)")]
    InvalidAspectRatio(String),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("invalid slide theme override `{0}` (expected INDEX=THEME)")]
    InvalidOverride(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SlideError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
