#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Maps a Postgres unique violation onto [`Error::Conflict`].
	pub fn from_unique_violation(err: sqlx::Error, message: impl Into<String>) -> Self {
		if let sqlx::Error::Database(db_err) = &err
			&& db_err.is_unique_violation()
		{
			return Self::Conflict(message.into());
		}

		Self::Sqlx(err)
	}
}
