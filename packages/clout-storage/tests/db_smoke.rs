use clout_config::Postgres;
use clout_storage::{Error, db::Db, models::NewInfluencer, queries};
use clout_testkit::TestDatabase;

fn new_influencer(cid: &str, users_count: i64) -> NewInfluencer {
	NewInfluencer {
		cid: cid.to_string(),
		social_type: Some("INST".to_string()),
		group_id: None,
		url: Some(format!("https://instagram.com/{cid}")),
		name: format!("Name {cid}"),
		image: String::new(),
		description: String::new(),
		screen_name: cid.to_string(),
		users_count: Some(users_count),
	}
}

async fn bootstrap(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLOUT_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = clout_testkit::dsn_or_skip("schema_bootstrap_is_idempotent") else {
		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;

	db.ensure_schema().await.expect("Second bootstrap must succeed.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name = 'influencers_categories'",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 1);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLOUT_PG_DSN to run."]
async fn duplicate_cid_is_a_conflict() {
	let Some(base_dsn) = clout_testkit::dsn_or_skip("duplicate_cid_is_a_conflict") else {
		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");

	queries::insert_influencer(&mut *conn, &new_influencer("INST:1", 10))
		.await
		.expect("First insert must succeed.");

	let err = queries::insert_influencer(&mut *conn, &new_influencer("INST:1", 10))
		.await
		.expect_err("Second insert must fail.");

	assert!(matches!(err, Error::Conflict(_)));

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLOUT_PG_DSN to run."]
async fn categories_register_unknown_names() {
	let Some(base_dsn) = clout_testkit::dsn_or_skip("categories_register_unknown_names") else {
		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let influencer = queries::insert_influencer(&mut *conn, &new_influencer("INST:2", 500))
		.await
		.expect("Insert must succeed.");
	let tags = vec!["travel".to_string(), "fitness".to_string()];
	let inserted = queries::insert_categories(&mut *conn, influencer.id, &tags)
		.await
		.expect("Category insert must succeed.");

	assert_eq!(inserted, tags);

	let stored = queries::fetch_categories(&db, influencer.id).await.expect("Fetch must succeed.");

	assert_eq!(stored, vec!["fitness".to_string(), "travel".to_string()]);

	drop(conn);
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CLOUT_PG_DSN to run."]
async fn refresh_scores_averages_ratings() {
	let Some(base_dsn) = clout_testkit::dsn_or_skip("refresh_scores_averages_ratings") else {
		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let db = bootstrap(&test_db).await;
	let mut conn = db.pool.acquire().await.expect("Failed to acquire connection.");
	let influencer = queries::insert_influencer(&mut *conn, &new_influencer("INST:3", 50))
		.await
		.expect("Insert must succeed.");

	drop(conn);

	for (username, score, credibility) in [("ana", 4, 2), ("bo", 2, 4)] {
		let user_id: i32 =
			sqlx::query_scalar("INSERT INTO users (username) VALUES ($1) RETURNING id")
				.bind(username)
				.fetch_one(&db.pool)
				.await
				.expect("Failed to insert user.");

		sqlx::query(
			"INSERT INTO ratings (user_id, influencer_id, score, credibility_score) VALUES ($1, $2, $3, $4)",
		)
		.bind(user_id)
		.bind(influencer.id)
		.bind(score)
		.bind(credibility)
		.execute(&db.pool)
		.await
		.expect("Failed to insert rating.");
	}

	let scores = queries::refresh_scores(&db, influencer.id)
		.await
		.expect("Refresh must succeed.")
		.expect("Influencer must exist.");

	assert_eq!(scores.score, Some(3.0));
	assert_eq!(scores.credibility_score, Some(3.0));
	assert!(
		queries::refresh_scores(&db, influencer.id + 1_000)
			.await
			.expect("Query must succeed.")
			.is_none()
	);

	let ratings = queries::fetch_ratings(&db, influencer.id).await.expect("Fetch must succeed.");

	assert_eq!(ratings.len(), 2);
	assert!(queries::delete_influencer(&db, influencer.id).await.expect("Delete must succeed."));
	assert!(!queries::delete_influencer(&db, influencer.id).await.expect("Delete must succeed."));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
