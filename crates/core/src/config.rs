use crate::error::ConfigError;
use url::Url;

pub const WEAVIATE_API_KEY: &str = "WEAVIATE_API_KEY";
pub const OPENAI_API_KEY_VARS: [&str; 2] = ["OPENAI_APIKEY", "OPENAI_API_KEY"];

#[derive(Clone)]
pub struct Credentials {
    pub weaviate_api_key: String,
    pub openai_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("weaviate_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves both keys through `lookup`; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let weaviate_api_key = non_blank(WEAVIATE_API_KEY).ok_or(ConfigError::MissingCredential {
            name: WEAVIATE_API_KEY,
        })?;
        let openai_api_key = OPENAI_API_KEY_VARS
            .iter()
            .find_map(|&name| non_blank(name))
            .ok_or(ConfigError::MissingCredential {
                name: OPENAI_API_KEY_VARS[0],
            })?;

        Ok(Self {
            weaviate_api_key,
            openai_api_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeaviateConfig {
    pub endpoint: Url,
    pub collection: String,
    pub credentials: Credentials,
}

impl WeaviateConfig {
    pub fn new(
        endpoint: &str,
        collection: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            endpoint: parse_endpoint(endpoint)?,
            collection: collection.into(),
            credentials,
        })
    }
}

/// Cloud cluster hosts are usually given bare, so a missing scheme means https.
pub fn parse_endpoint(endpoint: &str) -> Result<Url, ConfigError> {
    let trimmed = endpoint.trim().trim_end_matches('/');
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    Url::parse(&candidate).map_err(|source| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}
