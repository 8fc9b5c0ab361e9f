use serde::{Deserialize, Deserializer};

/// Serde helper for text fields the backend may send as `null` or omit.
///
/// * JSON field absent  => `""` (with `#[serde(default)]`)
/// * JSON field = null  => `""`
/// * JSON field = value => the value
pub fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serde helper for counters the backend may send as `null`.
pub fn nullable_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}
