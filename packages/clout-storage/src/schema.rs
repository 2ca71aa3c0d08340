pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

/// Splits rendered SQL into executable statements, dropping comment-only fragments.
pub fn statements(sql: &str) -> impl Iterator<Item = &str> {
	sql.split(';').map(str::trim).filter(|statement| {
		statement.lines().any(|line| {
			let line = line.trim();

			!line.is_empty() && !line.starts_with("--")
		})
	})
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_influencers.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_influencers.sql")),
				"tables/003_categories.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_categories.sql")),
				"tables/004_influencers_categories.sql" => out
					.push_str(include_str!("../../../sql/tables/004_influencers_categories.sql")),
				"tables/005_ratings.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_ratings.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
