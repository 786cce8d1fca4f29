//! Remote-service credentials read from the process environment.

use crate::error::{FolioError, Result};

pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
pub const PINECONE_INDEX_NAME: &str = "PINECONE_INDEX_NAME";
pub const PINECONE_CLOUD: &str = "PINECONE_CLOUD";
pub const PINECONE_REGION: &str = "PINECONE_REGION";
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Every variable that must be present before the pipeline starts.
pub const REQUIRED_VARIABLES: [&str; 5] = [
    PINECONE_API_KEY,
    PINECONE_INDEX_NAME,
    PINECONE_CLOUD,
    PINECONE_REGION,
    GEMINI_API_KEY,
];

/// Prefix of the older variable names (`MY_PINECONE_API_KEY`, ...), still
/// accepted when the unprefixed name is unset or empty.
pub const LEGACY_PREFIX: &str = "MY_";

/// Look up `name`, falling back to its `MY_`-prefixed form.
///
/// Blank values are treated as unset.
pub fn lookup_variable<F>(lookup: F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    present(lookup(name)).or_else(|| present(lookup(&format!("{}{}", LEGACY_PREFIX, name))))
}

/// The five required values for the vector index and the generative model.
#[derive(Clone)]
pub struct Credentials {
    pub pinecone_api_key: String,
    pub index_name: String,
    pub cloud: String,
    pub region: String,
    pub gemini_api_key: String,
}

impl Credentials {
    /// Read credentials from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary lookup.
    ///
    /// Empty values count as missing. All missing names are reported together,
    /// under their unprefixed form.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut values = Vec::with_capacity(REQUIRED_VARIABLES.len());

        for name in REQUIRED_VARIABLES {
            match lookup_variable(&lookup, name) {
                Some(value) => values.push(value.trim().to_string()),
                None => {
                    missing.push(name.to_string());
                    values.push(String::new());
                }
            }
        }

        if !missing.is_empty() {
            return Err(FolioError::MissingCredentials(missing));
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            pinecone_api_key: next(),
            index_name: next(),
            cloud: next(),
            region: next(),
            gemini_api_key: next(),
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("pinecone_api_key", &mask(&self.pinecone_api_key))
            .field("index_name", &self.index_name)
            .field("cloud", &self.cloud)
            .field("region", &self.region)
            .field("gemini_api_key", &mask(&self.gemini_api_key))
            .finish()
    }
}

/// Mask a secret for display, keeping only a short suffix.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
