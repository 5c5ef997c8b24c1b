//! Errors raised while loading or saving scene files

use std::path::PathBuf;

pub type SceneResult<T> = Result<T, SceneError>;

#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("expected 16 control points, got {0}")]
    InvalidControlPoints(usize),
}

impl SceneError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(SceneError::InvalidControlPoints(3)
            .to_string()
            .contains("got 3"));
        let io = SceneError::io("a.ron", std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(io.to_string().starts_with("IO error on a.ron"));
    }
}
