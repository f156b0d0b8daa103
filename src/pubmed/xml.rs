//! Parsing of E-utilities XML responses
//!
//! Only the handful of elements the graph stores are read; everything else
//! in a `PubmedArticleSet` is skipped.

use super::entry::{journal_issue, Author, PubMedEntry};
use super::fetcher::{FetchError, FetchResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeSet;

fn ends_with(path: &[String], suffix: &[&str]) -> bool {
    path.len() >= suffix.len()
        && path[path.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(a, b)| a == b)
}

fn inside(path: &[String], element: &str) -> bool {
    path.iter().any(|p| p == element)
}

/// Collapse runs of whitespace to single spaces and trim the ends.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn attribute(element: &BytesStart<'_>, name: &str) -> FetchResult<Option<String>> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| FetchError::Parse(e.to_string()))?;
    match attr {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

#[derive(Default)]
struct ArticleBuilder {
    entry: PubMedEntry,
    year: String,
    volume: String,
    issue: String,
    pages: String,
    author: Option<Author>,
    abstract_sections: usize,
    in_first_abstract: bool,
    id_type: Option<String>,
}

impl ArticleBuilder {
    fn start(&mut self, path: &[String], element: &BytesStart<'_>) -> FetchResult<()> {
        let name = path.last().map(String::as_str).unwrap_or_default();
        match name {
            "Author" if ends_with(path, &["AuthorList", "Author"]) => {
                self.author = Some(Author::default());
            }
            "AbstractText" if ends_with(path, &["Abstract", "AbstractText"]) => {
                self.abstract_sections += 1;
                self.in_first_abstract = self.abstract_sections == 1;
            }
            "ArticleId" => {
                self.id_type = attribute(element, "IdType")?;
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, path: &[String]) {
        if ends_with(path, &["AuthorList", "Author"]) {
            if let Some(author) = self.author.take() {
                self.entry.authors.push(author);
            }
        } else if ends_with(path, &["Abstract", "AbstractText"]) {
            self.in_first_abstract = false;
        } else if ends_with(path, &["ArticleId"]) {
            self.id_type = None;
        }
    }

    /// Title and abstract keep their raw text, including the whitespace
    /// around inline markup; every other field takes the trimmed text.
    fn text(&mut self, path: &[String], raw: &str) {
        if inside(path, "ArticleTitle") {
            self.entry.article_title.push_str(raw);
            return;
        }
        if self.in_first_abstract {
            self.entry.abstract_text.push_str(raw);
            return;
        }
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        if ends_with(path, &["MedlineCitation", "PMID"]) {
            if self.entry.pubmed_id.is_empty() {
                self.entry.pubmed_id = text.to_string();
            }
        } else if ends_with(path, &["Journal", "Title"]) {
            self.entry.journal_name = text.to_string();
        } else if ends_with(path, &["JournalIssue", "Volume"]) {
            self.volume = text.to_string();
        } else if ends_with(path, &["JournalIssue", "Issue"]) {
            self.issue = text.to_string();
        } else if ends_with(path, &["PubDate", "Year"]) {
            self.year = text.to_string();
        } else if ends_with(path, &["PubDate", "MedlineDate"]) {
            if self.year.is_empty() {
                self.year = text.chars().take(4).collect();
            }
        } else if ends_with(path, &["Pagination", "MedlinePgn"]) {
            self.pages = text.to_string();
        } else if let Some(author) = self.author.as_mut() {
            if ends_with(path, &["Author", "LastName"]) || ends_with(path, &["Author", "CollectiveName"]) {
                author.last_name = text.to_string();
            } else if ends_with(path, &["Author", "ForeName"]) {
                author.fore_name = text.to_string();
            } else if ends_with(path, &["Author", "Initials"]) {
                author.initials = text.to_string();
            }
        } else if ends_with(path, &["ArticleId"]) {
            let id_type = self.id_type.as_deref().unwrap_or_default();
            if inside(path, "ReferenceList") {
                if id_type == "pubmed" {
                    self.entry.references.insert(text.to_string());
                }
            } else if ends_with(path, &["PubmedData", "ArticleIdList", "ArticleId"]) {
                match id_type {
                    "pmc" => self.entry.pmc_id = text.to_string(),
                    "doi" => self.entry.doi_id = text.to_string(),
                    _ => {}
                }
            }
        }
    }

    fn finish(mut self) -> PubMedEntry {
        self.entry.article_title = collapse_whitespace(&self.entry.article_title);
        self.entry.abstract_text = collapse_whitespace(&self.entry.abstract_text);
        self.entry.journal_issue = journal_issue(&self.year, &self.volume, &self.issue, &self.pages);
        self.entry
    }
}

/// Parse every `PubmedArticle` of an efetch response.
pub fn parse_articles(xml: &str) -> FetchResult<Vec<PubMedEntry>> {
    let mut reader = Reader::from_str(xml);

    let mut path: Vec<String> = Vec::new();
    let mut article: Option<ArticleBuilder> = None;
    let mut entries = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                path.push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
                if ends_with(&path, &["PubmedArticle"]) {
                    article = Some(ArticleBuilder::default());
                } else if let Some(builder) = article.as_mut() {
                    builder.start(&path, &element)?;
                }
            }
            Event::End(_) => {
                if ends_with(&path, &["PubmedArticle"]) {
                    if let Some(builder) = article.take() {
                        let entry = builder.finish();
                        if !entry.pubmed_id.is_empty() {
                            entries.push(entry);
                        }
                    }
                } else if let Some(builder) = article.as_mut() {
                    builder.end(&path);
                }
                path.pop();
            }
            Event::Text(text) => {
                if let Some(builder) = article.as_mut() {
                    builder.text(&path, &text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(builder) = article.as_mut() {
                    builder.text(&path, &String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(entries)
}

/// Parse the linked ids of an elink `pubmed_pubmed_citedin` response.
pub fn parse_citations(xml: &str) -> FetchResult<BTreeSet<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut ids = BTreeSet::new();
    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                path.push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(text) if ends_with(&path, &["Link", "Id"]) => {
                ids.insert(text.unescape()?.into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}
