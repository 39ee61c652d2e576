use serde::{Deserialize, Deserializer};

/// Reads a present field into `Some`, so an explicit `null` becomes `Some(None)`.
///
/// Pair with `#[serde(default)]`: a missing field then stays `None` and leaves the value as is.
pub(crate) fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
