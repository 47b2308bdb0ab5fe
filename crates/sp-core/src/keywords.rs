use std::collections::BTreeSet;

use sp_utils::{contains_lowercase, lowercase_words};

/// Lower-cased search terms of one command.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    keywords: BTreeSet<String>,
}

impl KeywordIndex {
    /// Words of the name and of every path segment, plus each synonym as a
    /// whole, all lower-cased.
    pub fn derive<P, S>(name: &str, path: &[P], synonyms: &[S]) -> Self
    where
        P: AsRef<str>,
        S: AsRef<str>,
    {
        let mut keywords: BTreeSet<String> = lowercase_words(name).collect();
        for segment in path {
            keywords.extend(lowercase_words(segment.as_ref()));
        }
        keywords.extend(synonyms.iter().filter_map(|synonym| normalize(synonym.as_ref())));
        Self { keywords }
    }

    /// Use the given keywords as-is (lower-cased), ignoring name and path.
    pub fn explicit<I, K>(keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .filter_map(|keyword| normalize(keyword.as_ref()))
                .collect(),
        }
    }

    /// Whether some keyword contains `token` as a substring.
    ///
    /// `token` must already be lower-cased.
    pub fn contains_token(&self, token: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| contains_lowercase(keyword, token))
    }

    /// Exact membership.
    pub fn contains(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    /// Keywords in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Whether the index has no keywords.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

fn normalize(keyword: &str) -> Option<String> {
    if keyword.trim().is_empty() {
        None
    } else {
        Some(keyword.to_lowercase())
    }
}
