//! Helpers for using the figment config parsing library

use figment::providers::{Env, Format};
use json5 as json;

/// A figment provider that can parse JSON5.
pub struct JsonProvider;

impl Format for JsonProvider {
    type Error = json::Error;

    const NAME: &'static str = "JSON5";

    fn from_str<'de, T: serde::de::DeserializeOwned>(string: &'de str) -> Result<T, Self::Error> {
        json::from_str(string)
    }
}

/// Environment variables with the given prefix, with their keys converted to kebab-case.
///
/// `SPLITDIFF_SHOW_LARGE_HUNKS` maps to the `show-large-hunks` key, for example.
pub fn kebab_env(prefix: &str) -> Env {
    Env::prefixed(prefix).map(|key| key.as_str().to_ascii_lowercase().replace('_', "-").into())
}
