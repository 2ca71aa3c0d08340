use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Influencer {
	pub id: i32,
	pub cid: String,
	pub social_type: Option<String>,
	pub group_id: Option<String>,
	pub url: Option<String>,
	pub name: String,
	pub image: String,
	pub description: String,
	pub screen_name: String,
	pub users_count: Option<i64>,
	pub score: Option<f64>,
	pub credibility_score: Option<f64>,
	pub created_at: OffsetDateTime,
}

/// One row of a catalog search, with category associations folded into an array.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfluencerSearchRow {
	pub id: i32,
	pub cid: String,
	pub social_type: Option<String>,
	pub group_id: Option<String>,
	pub url: Option<String>,
	pub name: String,
	pub image: String,
	pub description: String,
	pub screen_name: String,
	pub users_count: Option<i64>,
	pub score: Option<f64>,
	pub credibility_score: Option<f64>,
	pub categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewInfluencer {
	pub cid: String,
	pub social_type: Option<String>,
	pub group_id: Option<String>,
	pub url: Option<String>,
	pub name: String,
	pub image: String,
	pub description: String,
	pub screen_name: String,
	pub users_count: Option<i64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RatingSummary {
	pub reviewer_name: String,
	pub score: i32,
	pub credibility_score: Option<i32>,
	pub review: Option<String>,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct InfluencerScores {
	pub score: Option<f64>,
	pub credibility_score: Option<f64>,
}
