use serde::{Deserialize, Serialize};

/// Public metadata of one repository, as consumed by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub name: String,
    #[serde(default)]
    pub fork_count: u64,
    #[serde(default)]
    pub star_count: u64,
    #[serde(default)]
    pub primary_language: Option<String>,
}

impl RepositoryRecord {
    /// The language, if one is set and not blank.
    pub fn language(&self) -> Option<&str> {
        self.primary_language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
    }
}

#[cfg(test)]
mod repository_record_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Rust"), Some("Rust"))]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(None, None)]
    fn it_should_only_expose_non_empty_languages(
        #[case] stored: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let record = RepositoryRecord {
            name: "repo".into(),
            fork_count: 0,
            star_count: 0,
            primary_language: stored.map(String::from),
        };
        assert_eq!(record.language(), expected);
    }

    #[rstest]
    fn it_should_default_missing_fields_when_deserializing() {
        let record: RepositoryRecord = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();
        assert_eq!(record.fork_count, 0);
        assert_eq!(record.star_count, 0);
        assert_eq!(record.primary_language, None);
    }
}
