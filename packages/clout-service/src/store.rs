use sqlx::{Connection, PgConnection};
use tracing::warn;

use clout_storage::{
	db::Db,
	models::{InfluencerScores, InfluencerSearchRow, NewInfluencer},
	queries,
};

use crate::{
	BoxFuture, CatalogStore, Error, ProfileDetail, ProfileRecord, Rating, Result,
	search::filter::LocalQuery,
};

/// [`CatalogStore`] backed by Postgres.
pub struct PgCatalogStore {
	db: Db,
}
impl PgCatalogStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	async fn find(&self, query: &LocalQuery) -> Result<Vec<ProfileRecord>> {
		let mut builder = query.to_builder();
		let rows: Vec<InfluencerSearchRow> =
			builder.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(rows.into_iter().map(ProfileRecord::from).collect())
	}

	async fn create(&self, new: &NewInfluencer, categories: &[String]) -> Result<ProfileRecord> {
		let mut tx = self.db.pool.begin().await?;

		if queries::influencer_id_by_cid(&mut *tx, &new.cid).await?.is_some() {
			return Err(Error::Conflict { message: format!("Duplicate influencer: {}", new.cid) });
		}

		let influencer = queries::insert_influencer(&mut *tx, new).await?;
		let attached = if categories.is_empty() {
			Vec::new()
		} else {
			attach_categories(&mut *tx, influencer.id, categories).await
		};

		tx.commit().await?;

		Ok(ProfileRecord::from_influencer(influencer, attached))
	}

	async fn detail(&self, id: i32) -> Result<Option<ProfileDetail>> {
		let Some(influencer) = queries::fetch_influencer(&self.db, id).await? else {
			return Ok(None);
		};
		let categories = queries::fetch_categories(&self.db, id).await?;
		let ratings = queries::fetch_ratings(&self.db, id).await?;

		Ok(Some(ProfileDetail {
			profile: ProfileRecord::from_influencer(influencer, categories),
			ratings: ratings.into_iter().map(Rating::from).collect(),
		}))
	}

	async fn id_for(&self, external_id: &str) -> Result<Option<i32>> {
		let mut conn = self.db.pool.acquire().await?;

		Ok(queries::influencer_id_by_cid(&mut *conn, external_id).await?)
	}
}

impl CatalogStore for PgCatalogStore {
	fn find_profiles<'a>(
		&'a self,
		query: &'a LocalQuery,
	) -> BoxFuture<'a, Result<Vec<ProfileRecord>>> {
		Box::pin(self.find(query))
	}

	fn create_profile<'a>(
		&'a self,
		profile: &'a NewInfluencer,
		categories: &'a [String],
	) -> BoxFuture<'a, Result<ProfileRecord>> {
		Box::pin(self.create(profile, categories))
	}

	fn profile_detail<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<Option<ProfileDetail>>> {
		Box::pin(self.detail(id))
	}

	fn profile_id<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Option<i32>>> {
		Box::pin(self.id_for(external_id))
	}

	fn refresh_scores<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<Option<InfluencerScores>>> {
		Box::pin(async move { Ok(queries::refresh_scores(&self.db, id).await?) })
	}

	fn delete_profile<'a>(&'a self, id: i32) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move { Ok(queries::delete_influencer(&self.db, id).await?) })
	}
}

/// Attaches categories inside a savepoint so a failure leaves the new profile in place with none.
async fn attach_categories(
	conn: &mut PgConnection,
	influencer_id: i32,
	categories: &[String],
) -> Vec<String> {
	let mut savepoint = match conn.begin().await {
		Ok(savepoint) => savepoint,
		Err(err) => {
			warn!(error = %err, influencer_id, "Failed to open category savepoint.");

			return Vec::new();
		},
	};

	match queries::insert_categories(&mut *savepoint, influencer_id, categories).await {
		Ok(attached) => match savepoint.commit().await {
			Ok(()) => attached,
			Err(err) => {
				warn!(error = %err, influencer_id, "Failed to release category savepoint.");

				Vec::new()
			},
		},
		Err(err) => {
			warn!(error = %err, influencer_id, "Dropping cached categories for new profile.");

			if let Err(err) = savepoint.rollback().await {
				warn!(error = %err, influencer_id, "Failed to roll back category savepoint.");
			}

			Vec::new()
		},
	}
}
