use serde::Deserialize;
use url::Url;

use crate::types::{ValidatorError, ValidatorResult};

pub(crate) fn validate_url(name: &str, url: &str) -> ValidatorResult<Url> {
    match Url::parse(url) {
        Ok(u) if u.scheme() == "https" || u.scheme() == "http" => Ok(u),
        _ => Err(ValidatorError::invalid_argument_with(
            name,
            "only valid absolute http(s) URLs can be requested",
        )),
    }
}

/// Joins `issuer` and `well_known_path` with exactly one `/` between them.
pub(crate) fn discovery_url(issuer: &str, well_known_path: &str) -> ValidatorResult<Url> {
    let joined = format!(
        "{}/{}",
        issuer.trim_end_matches('/'),
        well_known_path.trim_start_matches('/')
    );

    validate_url("issuer", &joined)
}

/// Converts plain JSON to a struct/enum that impl's serde's [Deserialize]. Uses [serde_json::from_str] under
/// the hood
pub(crate) fn convert_json_to<T: for<'a> Deserialize<'a>>(plain: &str) -> Result<T, String> {
    serde_json::from_str::<T>(plain).map_err(|e| format!("Parse Error: {e}"))
}
