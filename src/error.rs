use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while building a scene. All of these abort
/// loading; a partially parsed scene is never returned.
#[derive(Debug)]
pub enum SceneError {
    Io { path: PathBuf, source: io::Error },
    UnknownToken(String),
    MissingField { keyword: String, field: &'static str },
    InvalidNumber { keyword: String, token: String },
    InvalidDrawMode(String),
    MissingCamera,
    Json(serde_json::Error),
    Mesh { path: PathBuf, reason: String },
}

impl SceneError {
    pub(crate) fn mesh(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SceneError::Mesh { path: path.into(), reason: reason.into() }
    }
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io { path, source } => write!(f, "cannot open {}: {source}", path.display()),
            SceneError::UnknownToken(token) => write!(f, "invalid token encountered: {token}"),
            SceneError::MissingField { keyword, field } => {
                write!(f, "unexpected end of file: `{keyword}` is missing its {field}")
            }
            SceneError::InvalidNumber { keyword, token } => {
                write!(f, "`{keyword}`: expected a number, found `{token}`")
            }
            SceneError::InvalidDrawMode(mode) => write!(f, "invalid draw mode {mode}"),
            SceneError::MissingCamera => write!(f, "scene has no camera"),
            SceneError::Json(e) => write!(f, "json parse: {e}"),
            SceneError::Mesh { path, reason } => write!(f, "cannot load mesh {}: {reason}", path.display()),
        }
    }
}

impl Error for SceneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SceneError::Io { source, .. } => Some(source),
            SceneError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(e: serde_json::Error) -> Self {
        SceneError::Json(e)
    }
}
