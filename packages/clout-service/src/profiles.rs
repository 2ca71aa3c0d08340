use serde::{Deserialize, Serialize};
use tracing::info;

use clout_storage::models::NewInfluencer;

use crate::{
	CloutService, Error, ProfileDetail, ProfileRecord, Result, ScoreSummary, cache::CallerScope,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileRequest {
	pub external_id: String,
	#[serde(default)]
	pub social_type: Option<String>,
	#[serde(default)]
	pub group_id: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	pub display_name: String,
	#[serde(default)]
	pub screen_name: String,
	#[serde(default)]
	pub image_url: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub popularity_count: Option<i64>,
}

impl CloutService {
	/// Creates a catalog profile, attaching as categories any provider tags the caller's latest
	/// search cached for the same `external_id`.
	pub async fn create_profile(
		&self,
		scope: &CallerScope,
		req: CreateProfileRequest,
	) -> Result<ProfileRecord> {
		let external_id = req.external_id.trim();
		let display_name = req.display_name.trim();

		if external_id.is_empty() {
			return Err(Error::InvalidRequest { message: "external_id is required.".to_string() });
		}
		if display_name.is_empty() {
			return Err(Error::InvalidRequest { message: "display_name is required.".to_string() });
		}
		if req.popularity_count.is_some_and(|count| count < 0) {
			return Err(Error::InvalidRequest {
				message: "popularity_count must be zero or greater.".to_string(),
			});
		}

		let categories = self
			.cache
			.tags_for(scope, external_id)
			.map(|tags| sanitize_tags(&tags))
			.unwrap_or_default();
		let new = NewInfluencer {
			cid: external_id.to_string(),
			social_type: req.social_type,
			group_id: req.group_id,
			url: req.url,
			name: display_name.to_string(),
			image: req.image_url,
			description: req.description,
			screen_name: req.screen_name.trim().to_string(),
			users_count: req.popularity_count,
		};
		let profile = self.store.create_profile(&new, &categories).await?;

		if !profile.categories.is_empty() {
			info!(
				external_id = %profile.external_id,
				categories = profile.categories.len(),
				"Attached cached provider tags to new profile."
			);
		}

		Ok(profile)
	}

	pub async fn get_profile(&self, id: i32) -> Result<ProfileDetail> {
		self.store
			.profile_detail(id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("No influencer with id: {id}") })
	}

	/// Resolves an external identifier to the catalog id.
	pub async fn resolve_profile_id(&self, external_id: &str) -> Result<i32> {
		self.store.profile_id(external_id.trim()).await?.ok_or_else(|| Error::NotFound {
			message: format!("No influencer with external id: {external_id}"),
		})
	}

	/// Recomputes a profile's scores from its ratings.
	pub async fn refresh_scores(&self, id: i32) -> Result<ScoreSummary> {
		let scores = self
			.store
			.refresh_scores(id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("No influencer with id: {id}") })?;

		Ok(ScoreSummary { score: scores.score, credibility_score: scores.credibility_score })
	}

	pub async fn delete_profile(&self, id: i32) -> Result<()> {
		if !self.store.delete_profile(id).await? {
			return Err(Error::NotFound { message: format!("No influencer with id: {id}") });
		}

		Ok(())
	}
}

/// Trims tags, drops blanks, and removes repeats while keeping first-seen order.
fn sanitize_tags(tags: &[String]) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(tags.len());

	for tag in tags.iter().map(|tag| tag.trim()).filter(|tag| !tag.is_empty()) {
		if !out.iter().any(|existing| existing == tag) {
			out.push(tag.to_string());
		}
	}

	out
}
