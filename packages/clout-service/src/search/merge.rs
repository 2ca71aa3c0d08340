use std::collections::HashSet;

use crate::ProfileRecord;

/// Combines catalog and provider results into one list.
///
/// Every catalog record is kept, in order, as the prefix. Provider records follow in provider
/// order, skipping any whose `external_id` is already present. That covers catalog ids and ids
/// emitted earlier from the provider list itself, so a provider repeat keeps its first position.
/// Nothing is re-sorted: each input is already ranked by its own source.
pub fn merge(local: Vec<ProfileRecord>, external: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
	let mut seen: HashSet<String> =
		local.iter().map(|record| record.external_id.clone()).collect();
	let mut merged = local;

	merged.reserve(external.len());

	for record in external {
		if seen.insert(record.external_id.clone()) {
			merged.push(record);
		}
	}

	merged
}
