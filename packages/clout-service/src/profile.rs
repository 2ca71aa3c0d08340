use serde::{Deserialize, Serialize};

use clout_providers::stats::StatsProfile;
use clout_storage::models::{Influencer, InfluencerSearchRow, RatingSummary};

/// Canonical profile shape returned to callers, whichever source produced it.
///
/// `external_id` is the only identity used to reconcile sources. Every other field is display
/// data that may differ between the catalog and the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
	/// Catalog id. Absent for provider-only candidates.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<i32>,
	pub external_id: String,
	pub social_type: Option<String>,
	pub group_id: Option<String>,
	pub url: Option<String>,
	pub display_name: String,
	pub screen_name: String,
	pub image_url: String,
	pub description: String,
	pub popularity_count: Option<i64>,
	pub score: Option<f64>,
	pub credibility_score: Option<f64>,
	pub categories: Vec<String>,
	/// Provider tags. Catalog rows never carry them.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub tags: Vec<String>,
}
impl From<InfluencerSearchRow> for ProfileRecord {
	fn from(row: InfluencerSearchRow) -> Self {
		Self {
			id: Some(row.id),
			external_id: row.cid,
			social_type: row.social_type,
			group_id: row.group_id,
			url: row.url,
			display_name: row.name,
			screen_name: row.screen_name,
			image_url: row.image,
			description: row.description,
			popularity_count: row.users_count,
			score: row.score,
			credibility_score: row.credibility_score,
			categories: row.categories,
			tags: Vec::new(),
		}
	}
}

impl ProfileRecord {
	pub(crate) fn from_influencer(influencer: Influencer, categories: Vec<String>) -> Self {
		Self {
			id: Some(influencer.id),
			external_id: influencer.cid,
			social_type: influencer.social_type,
			group_id: influencer.group_id,
			url: influencer.url,
			display_name: influencer.name,
			screen_name: influencer.screen_name,
			image_url: influencer.image,
			description: influencer.description,
			popularity_count: influencer.users_count,
			score: influencer.score,
			credibility_score: influencer.credibility_score,
			categories,
			tags: Vec::new(),
		}
	}

	pub(crate) fn from_stats(profile: StatsProfile) -> Self {
		let group_id = profile.group_id_string();

		Self {
			id: None,
			external_id: profile.cid,
			social_type: profile.social_type,
			group_id,
			url: profile.url,
			display_name: profile.name.unwrap_or_default(),
			screen_name: profile.screen_name.unwrap_or_default(),
			image_url: profile.image.unwrap_or_default(),
			description: profile.description.unwrap_or_default(),
			popularity_count: profile.users_count,
			score: None,
			credibility_score: None,
			categories: Vec::new(),
			tags: profile.tags.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
	pub reviewer_name: String,
	pub score: i32,
	pub credibility_score: Option<i32>,
	pub review: Option<String>,
}
impl From<RatingSummary> for Rating {
	fn from(summary: RatingSummary) -> Self {
		Self {
			reviewer_name: summary.reviewer_name,
			score: summary.score,
			credibility_score: summary.credibility_score,
			review: summary.review,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDetail {
	#[serde(flatten)]
	pub profile: ProfileRecord,
	pub ratings: Vec<Rating>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
	pub score: Option<f64>,
	pub credibility_score: Option<f64>,
}
