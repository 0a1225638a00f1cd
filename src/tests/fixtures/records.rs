// Shared test fixture for repository records.

use crate::modules::repository_charts::core::record::RepositoryRecord;

pub struct RepositoryRecordBuilder {
    inner: RepositoryRecord,
}

impl Default for RepositoryRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl RepositoryRecordBuilder {
    pub fn new() -> Self {
        Self {
            inner: RepositoryRecord {
                name: "badge-generator".to_string(),
                fork_count: 0,
                star_count: 0,
                primary_language: Some("Python".to_string()),
            },
        }
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.name = v.into();
        self
    }

    pub fn forks(mut self, v: u64) -> Self {
        self.inner.fork_count = v;
        self
    }

    pub fn stars(mut self, v: u64) -> Self {
        self.inner.star_count = v;
        self
    }

    pub fn language(mut self, v: Option<&str>) -> Self {
        self.inner.primary_language = v.map(String::from);
        self
    }

    pub fn build(self) -> RepositoryRecord {
        self.inner
    }
}

/// A small portfolio with distinct fork and star counts and a few languages.
pub fn sample_portfolio() -> Vec<RepositoryRecord> {
    vec![
        RepositoryRecordBuilder::new()
            .name("alpha")
            .forks(3)
            .stars(30)
            .language(Some("Rust"))
            .build(),
        RepositoryRecordBuilder::new()
            .name("beta")
            .forks(1)
            .stars(12)
            .language(Some("Go"))
            .build(),
        RepositoryRecordBuilder::new()
            .name("gamma")
            .forks(4)
            .stars(7)
            .language(Some("Rust"))
            .build(),
        RepositoryRecordBuilder::new()
            .name("delta")
            .forks(1)
            .stars(0)
            .language(None)
            .build(),
        RepositoryRecordBuilder::new()
            .name("epsilon")
            .forks(5)
            .stars(2)
            .language(Some("Python"))
            .build(),
    ]
}

#[cfg(test)]
mod repository_record_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn setters_override_all_fields_and_build_returns_inner() {
        let record = RepositoryRecordBuilder::new()
            .name("custom")
            .forks(1)
            .stars(2)
            .language(None)
            .build();

        assert_eq!(record.name, "custom");
        assert_eq!(record.fork_count, 1);
        assert_eq!(record.star_count, 2);
        assert_eq!(record.primary_language, None);
    }
}
