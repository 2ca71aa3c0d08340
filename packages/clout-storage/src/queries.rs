use sqlx::PgConnection;

use crate::{
	Error, Result,
	db::Db,
	models::{Influencer, InfluencerScores, NewInfluencer, RatingSummary},
};

/// Column list and source for catalog searches. Callers append `WHERE` predicates followed by
/// [`SEARCH_ORDER`].
pub const SEARCH_SELECT: &str = "\
SELECT
	i.id,
	i.cid,
	i.social_type,
	i.group_id,
	i.url,
	i.name,
	i.image,
	i.description,
	i.screen_name,
	i.users_count,
	i.score,
	i.credibility_score,
	ARRAY(
		SELECT ic.category
		FROM influencers_categories AS ic
		WHERE ic.influencer_id = i.id
		ORDER BY ic.category
	) AS categories
FROM influencers AS i";

pub const SEARCH_ORDER: &str = " ORDER BY i.score DESC NULLS LAST, i.id";

const INFLUENCER_COLUMNS: &str = "\
id,
	cid,
	social_type,
	group_id,
	url,
	name,
	image,
	description,
	screen_name,
	users_count,
	score,
	credibility_score,
	created_at";

pub async fn influencer_id_by_cid(conn: &mut PgConnection, cid: &str) -> Result<Option<i32>> {
	let id = sqlx::query_scalar("SELECT id FROM influencers WHERE cid = $1")
		.bind(cid)
		.fetch_optional(conn)
		.await?;

	Ok(id)
}

pub async fn insert_influencer(conn: &mut PgConnection, new: &NewInfluencer) -> Result<Influencer> {
	let sql = format!(
		"\
INSERT INTO influencers (
	cid,
	social_type,
	group_id,
	url,
	name,
	image,
	description,
	screen_name,
	users_count
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING {INFLUENCER_COLUMNS}"
	);

	sqlx::query_as(&sql)
		.bind(new.cid.as_str())
		.bind(new.social_type.as_deref())
		.bind(new.group_id.as_deref())
		.bind(new.url.as_deref())
		.bind(new.name.as_str())
		.bind(new.image.as_str())
		.bind(new.description.as_str())
		.bind(new.screen_name.as_str())
		.bind(new.users_count)
		.fetch_one(conn)
		.await
		.map_err(|err| {
			Error::from_unique_violation(err, format!("Duplicate influencer: {}", new.cid))
		})
}

/// Associates `categories` with an influencer, registering unknown category names first.
///
/// Returns the associated categories in the order given.
pub async fn insert_categories(
	conn: &mut PgConnection,
	influencer_id: i32,
	categories: &[String],
) -> Result<Vec<String>> {
	if categories.is_empty() {
		return Ok(Vec::new());
	}

	sqlx::query(
		"\
INSERT INTO categories (category)
SELECT UNNEST($1::text[])
ON CONFLICT (category) DO NOTHING",
	)
	.bind(categories)
	.execute(&mut *conn)
	.await?;
	sqlx::query(
		"\
INSERT INTO influencers_categories (category, influencer_id)
SELECT UNNEST($1::text[]), $2
ON CONFLICT (influencer_id, category) DO NOTHING",
	)
	.bind(categories)
	.bind(influencer_id)
	.execute(&mut *conn)
	.await?;

	Ok(categories.to_vec())
}

pub async fn fetch_influencer(db: &Db, id: i32) -> Result<Option<Influencer>> {
	let sql = format!("SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE id = $1");
	let influencer = sqlx::query_as(&sql).bind(id).fetch_optional(&db.pool).await?;

	Ok(influencer)
}

pub async fn fetch_categories(db: &Db, influencer_id: i32) -> Result<Vec<String>> {
	let categories = sqlx::query_scalar(
		"\
SELECT category
FROM influencers_categories
WHERE influencer_id = $1
ORDER BY category",
	)
	.bind(influencer_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(categories)
}

pub async fn fetch_ratings(db: &Db, influencer_id: i32) -> Result<Vec<RatingSummary>> {
	let ratings = sqlx::query_as(
		"\
SELECT
	u.username AS reviewer_name,
	r.score,
	r.credibility_score,
	r.review
FROM ratings AS r
JOIN users AS u ON u.id = r.user_id
WHERE r.influencer_id = $1
ORDER BY r.created_at DESC",
	)
	.bind(influencer_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(ratings)
}

/// Recomputes an influencer's scores as the averages of its ratings.
///
/// Returns `None` when the influencer does not exist. Scores become `NULL` when it has no ratings.
pub async fn refresh_scores(db: &Db, influencer_id: i32) -> Result<Option<InfluencerScores>> {
	let scores = sqlx::query_as(
		"\
UPDATE influencers AS i
SET
	score = agg.score,
	credibility_score = agg.credibility_score
FROM (
	SELECT
		AVG(r.score)::float8 AS score,
		AVG(r.credibility_score)::float8 AS credibility_score
	FROM ratings AS r
	WHERE r.influencer_id = $1
) AS agg
WHERE i.id = $1
RETURNING i.score, i.credibility_score",
	)
	.bind(influencer_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(scores)
}

pub async fn delete_influencer(db: &Db, influencer_id: i32) -> Result<bool> {
	let result = sqlx::query("DELETE FROM influencers WHERE id = $1")
		.bind(influencer_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}
