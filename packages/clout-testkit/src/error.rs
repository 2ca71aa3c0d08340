pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid {env} value: {source}")]
	InvalidDsn { env: &'static str, source: sqlx::Error },
	#[error("No admin database accepted a connection: {0:?}")]
	AdminUnavailable(Option<sqlx::Error>),
	#[error("Failed to create scratch database {name}: {source}")]
	Create { name: String, source: sqlx::Error },
	#[error("Failed to drop scratch database {name}: {source}")]
	DropDatabase { name: String, source: sqlx::Error },
}
