//! Serde adapter for optional text attributes stored as empty strings.
//!
//! The document store keeps absent descriptions, cover images and avatars as
//! `""` rather than omitting the attribute. Typed records use `Option<String>`
//! and convert at the boundary.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Holder {
        #[serde(default, with = "super")]
        text: Option<String>,
    }

    #[test]
    fn test_blank_and_null_read_as_none() {
        let holder: Holder = serde_json::from_value(json!({ "text": "" })).unwrap();
        assert_eq!(holder.text, None);

        let holder: Holder = serde_json::from_value(json!({ "text": null })).unwrap();
        assert_eq!(holder.text, None);

        let holder: Holder = serde_json::from_value(json!({})).unwrap();
        assert_eq!(holder.text, None);
    }

    #[test]
    fn test_none_written_as_empty_string() {
        let value = serde_json::to_value(Holder { text: None }).unwrap();
        assert_eq!(value, json!({ "text": "" }));
    }
}
