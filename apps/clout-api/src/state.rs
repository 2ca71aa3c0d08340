use std::sync::Arc;

use clout_service::CloutService;
use clout_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CloutService>,
}
impl AppState {
	pub async fn new(config: clout_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(CloutService::new(config, db)))
	}

	pub fn from_service(service: CloutService) -> Self {
		Self { service: Arc::new(service) }
	}
}
