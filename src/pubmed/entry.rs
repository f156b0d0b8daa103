//! Bibliographic entries and the roles an article plays in a walk

use crate::graph::Properties;
use crate::model::properties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label added to articles cited by COSMIC records
pub const COSMIC_ARTICLE_LABEL: &str = "CosmicArticle";

/// Role of an article relative to an origin, accumulated as a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleRole {
    Origin,
    Reference,
    Citation,
}

impl ArticleRole {
    pub fn label(&self) -> &'static str {
        match self {
            ArticleRole::Origin => "Origin",
            ArticleRole::Reference => "Reference",
            ArticleRole::Citation => "Citation",
        }
    }

    /// Relationship from an origin to an article in this role
    pub fn relationship(&self) -> Option<&'static str> {
        match self {
            ArticleRole::Origin => None,
            ArticleRole::Reference => Some("HAS_REFERENCE"),
            ArticleRole::Citation => Some("CITED_BY"),
        }
    }

    pub const ALL: [ArticleRole; 3] = [
        ArticleRole::Origin,
        ArticleRole::Reference,
        ArticleRole::Citation,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub last_name: String,
    pub fore_name: String,
    pub initials: String,
}

impl Author {
    /// `Last, Fore Initials`, omitting missing parts
    pub fn caption(&self) -> String {
        let mut name = self.last_name.clone();
        if !self.fore_name.is_empty() {
            name.push_str(", ");
            name.push_str(&self.fore_name);
        }
        if !self.initials.is_empty() {
            name.push(' ');
            name.push_str(&self.initials);
        }
        name
    }
}

/// First two authors joined by `; `, with `; et al` when there are more
pub fn author_caption(authors: &[Author]) -> String {
    let names: Vec<String> = authors.iter().take(2).map(Author::caption).collect();
    let mut caption = names.join("; ");
    if authors.len() > 2 {
        caption.push_str("; et al");
    }
    caption
}

/// `<year> <volume>(<issue>):<pages>`, truncated at the first missing part
pub fn journal_issue(year: &str, volume: &str, issue: &str, pages: &str) -> String {
    if volume.is_empty() {
        return String::new();
    }
    let mut caption = format!("{} {}", year, volume);
    if !issue.is_empty() {
        caption.push_str(&format!("({})", issue));
        if !pages.is_empty() {
            caption.push(':');
            caption.push_str(pages);
        }
    }
    caption
}

/// One parsed PubMed article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PubMedEntry {
    pub pubmed_id: String,
    pub pmc_id: String,
    pub doi_id: String,
    pub journal_name: String,
    pub journal_issue: String,
    pub article_title: String,
    pub abstract_text: String,
    pub authors: Vec<Author>,
    /// PubMed ids this article cites
    pub references: BTreeSet<String>,
    /// PubMed ids citing this article, when they were fetched
    pub citations: BTreeSet<String>,
}

impl PubMedEntry {
    pub fn new(pubmed_id: impl Into<String>) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            ..Self::default()
        }
    }

    pub fn author_caption(&self) -> String {
        author_caption(&self.authors)
    }

    /// Properties written when the article node is promoted
    pub fn properties(&self) -> Properties {
        properties([
            ("pmc_id", self.pmc_id.as_str().into()),
            ("doi_id", self.doi_id.as_str().into()),
            ("journal_name", self.journal_name.as_str().into()),
            ("journal_issue", self.journal_issue.as_str().into()),
            ("article_title", self.article_title.as_str().into()),
            ("abstract", self.abstract_text.as_str().into()),
            ("author", self.author_caption().into()),
            ("reference_count", self.references.len().into()),
            ("cited_by_count", self.citations.len().into()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(last: &str, fore: &str, initials: &str) -> Author {
        Author {
            last_name: last.into(),
            fore_name: fore.into(),
            initials: initials.into(),
        }
    }

    #[test]
    fn caption_for_up_to_two_authors() {
        assert_eq!(author_caption(&[]), "");
        assert_eq!(author_caption(&[author("Smith", "Robert", "R")]), "Smith, Robert R");
        assert_eq!(
            author_caption(&[author("Smith", "Robert", "R"), author("Jones", "Mary", "")]),
            "Smith, Robert R; Jones, Mary"
        );
    }

    #[test]
    fn caption_adds_et_al() {
        let authors = vec![
            author("Smith", "Robert", "R"),
            author("Jones", "Mary", "M"),
            author("Lee", "", ""),
        ];
        assert_eq!(author_caption(&authors), "Smith, Robert R; Jones, Mary M; et al");
    }

    #[test]
    fn journal_issue_truncates_at_missing_part() {
        assert_eq!(journal_issue("2015", "161", "7", "1681-96"), "2015 161(7):1681-96");
        assert_eq!(journal_issue("2015", "161", "", "1681-96"), "2015 161");
        assert_eq!(journal_issue("2015", "", "7", ""), "");
    }

    #[test]
    fn properties_count_references() {
        let mut entry = PubMedEntry::new("26050619");
        entry.references.insert("1".into());
        entry.references.insert("2".into());
        let props = entry.properties();
        assert_eq!(props["reference_count"].as_int(), Some(2));
        assert_eq!(props["cited_by_count"].as_int(), Some(0));
    }

    #[test]
    fn roles_map_to_labels_and_relationships() {
        assert_eq!(ArticleRole::Reference.relationship(), Some("HAS_REFERENCE"));
        assert_eq!(ArticleRole::Citation.relationship(), Some("CITED_BY"));
        assert_eq!(ArticleRole::Origin.relationship(), None);
        assert_eq!(ArticleRole::Citation.label(), "Citation");
    }
}
