//! Scratch Postgres databases for catalog integration tests.
//!
//! Tests read `CLOUT_PG_DSN` through [`dsn_or_skip`], create a uniquely named database with
//! [`TestDatabase::new`], and drop it through [`TestDatabase::cleanup`] or on drop.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const PG_DSN_ENV: &str = "CLOUT_PG_DSN";

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|source| Error::InvalidDsn { env: PG_DSN_ENV, source })?;
		let (admin, mut conn) = admin_connection(&base).await?;
		let name = format!("clout_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|source| Error::Create { name: name.clone(), source })?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.name, &self.admin).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let admin = self.admin.clone();
		// A panicking test may be tearing down its runtime, so drop on a fresh one.
		let handle = thread::spawn(move || {
			let outcome = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_database(&name, &admin)).map_err(|err| err.to_string())
				});

			if let Err(err) = outcome {
				eprintln!("Leaked scratch database {name}: {err}");
			}
		});
		let _ = handle.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var(PG_DSN_ENV).ok().filter(|value| !value.trim().is_empty())
}

/// Returns the base DSN, or reports that `test` is skipped when none is configured.
pub fn dsn_or_skip(test: &str) -> Option<String> {
	let dsn = env_dsn();

	if dsn.is_none() {
		eprintln!("Skipping {test}; set {PG_DSN_ENV} to run it.");
	}

	dsn
}

async fn admin_connection(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let mut failure = None;

	for database in ADMIN_DATABASES {
		let options = base.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failure = Some(err),
		}
	}

	Err(Error::AdminUnavailable(failure))
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	let to_error = |source: sqlx::Error| Error::DropDatabase { name: name.to_string(), source };
	let mut conn = PgConnection::connect_with(admin).await.map_err(to_error)?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str())
		.await
		.map_err(to_error)?;

	Ok(())
}
