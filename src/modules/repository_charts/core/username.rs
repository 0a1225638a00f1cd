use std::fmt;

use thiserror::Error;

const MAX_LEN: usize = 39;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid GitHub username: {0:?}")]
pub struct InvalidUsername(pub String);

/// A GitHub login that is safe to put in a URL path and a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, InvalidUsername> {
        let valid = !raw.is_empty()
            && raw.len() <= MAX_LEN
            && !raw.starts_with('-')
            && !raw.ends_with('-')
            && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidUsername(raw.to_string()))
        }
    }

    /// Logins are case-insensitive on GitHub, so cache entries are keyed on this.
    pub fn cache_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod username_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("octocat")]
    #[case("yohanes-gultom")]
    #[case("a")]
    #[case("A1-b2-C3")]
    fn it_should_accept_valid_logins(#[case] raw: &str) {
        assert_eq!(Username::parse(raw).unwrap().to_string(), raw);
    }

    #[rstest]
    #[case("")]
    #[case("-leading")]
    #[case("trailing-")]
    #[case("under_score")]
    #[case("../etc")]
    #[case("with space")]
    #[case("a-very-long-login-name-that-goes-past-39")]
    fn it_should_reject_invalid_logins(#[case] raw: &str) {
        assert_eq!(Username::parse(raw), Err(InvalidUsername(raw.to_string())));
    }

    #[rstest]
    fn it_should_lowercase_the_cache_key() {
        let username = Username::parse("OctoCat").unwrap();
        assert_eq!(username.cache_key(), "octocat");
        assert_eq!(username.to_string(), "OctoCat");
    }
}
