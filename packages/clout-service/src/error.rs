pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid filter: {message}")]
	InvalidFilter { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_filter(message: impl Into<String>) -> Self {
		Self::InvalidFilter { message: message.into() }
	}
}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<clout_storage::Error> for Error {
	fn from(err: clout_storage::Error) -> Self {
		match err {
			clout_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			clout_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
