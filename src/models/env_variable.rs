use serde::{Deserialize, Serialize};

/// One environment variable as reported by the service.
///
/// `index` is the 1-based line of the `export` statement in the loaded file.
/// `value` holds the colon-separated segments in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariableResponse {
    #[serde(deserialize_with = "index::deserialize")]
    pub index: u64,
    pub key: String,
    pub value: Vec<String>,
}

/// Body of an update/add request for an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariableRequest {
    #[serde(deserialize_with = "index::deserialize")]
    pub index: u64,
    pub key: String,
    pub value: Vec<String>,
}

impl EnvVariableRequest {
    pub fn new(index: u64, key: impl Into<String>, value: Vec<String>) -> Self {
        Self {
            index,
            key: key.into(),
            value,
        }
    }
}

impl From<EnvVariableResponse> for EnvVariableRequest {
    fn from(response: EnvVariableResponse) -> Self {
        Self {
            index: response.index,
            key: response.key,
            value: response.value,
        }
    }
}

/// `index` arrives as a JSON number from Rust producers and as a decimal
/// string from producers that cannot carry 64-bit integers losslessly.
/// Both forms are accepted; a value that does not fit in a `u64` is an error.
mod index {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::Deserializer;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IndexVisitor)
    }

    struct IndexVisitor;

    impl<'de> Visitor<'de> for IndexVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned 64-bit integer or its decimal string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            v.trim()
                .parse::<u64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}
