pub mod stats;

mod error;

pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderName};

const HOST_HEADER: &str = "x-rapidapi-host";

/// Builds the credential and routing headers sent with every provider request.
pub fn auth_headers(cfg: &clout_config::StatsProviderConfig) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(HeaderName::from_bytes(cfg.api_key_header.as_bytes())?, cfg.api_key.parse()?);
	headers.insert(HeaderName::from_static(HOST_HEADER), cfg.host.parse()?);

	for (key, value) in &cfg.default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		if key.eq_ignore_ascii_case(HOST_HEADER) || key.eq_ignore_ascii_case(&cfg.api_key_header) {
			continue;
		}

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
