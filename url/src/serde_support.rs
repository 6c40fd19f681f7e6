//! `serde` support, gated behind the `serde` feature: a `Url` serializes as
//! its canonical string form and deserializes through the parser, the way
//! the upstream crate's `serde.rs` does (simplified here since our `serde`
//! dependency enables `derive`, so `Host`'s impls come from a plain
//! `#[derive]` in `host.rs` instead of hand-written visitors).

use alloc::string::String;

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::Url;

impl Serialize for Url {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.as_str())
    }
}

impl<'de> Deserialize<'de> for Url {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use crate::Url;

    #[test]
    fn round_trips_through_json() {
        let url = Url::parse("https://example.com/a?b=1#c").unwrap();
        let json = serde_json::to_string(&url).unwrap();
        let back: Url = serde_json::from_str(&json).unwrap();
        assert_eq!(url, back);
    }
}
