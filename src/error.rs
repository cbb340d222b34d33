//! Crate error type.

/// Failures while loading story data. A scene that simply has nothing to draw
/// is not an error; see [`crate::scene::build_graph`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The story or scene document is not valid JSON for the expected shape.
	#[error("malformed scene data: {0}")]
	Json(#[from] serde_json::Error),
	/// A scene key was requested that the story does not contain.
	#[error("story has no scene named {0:?}")]
	UnknownScene(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
