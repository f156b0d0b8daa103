//! Tumor type abbreviations used by the Cancer Gene Census

use super::{DelimitedFile, RecordSource, SourceResult};
use std::collections::HashMap;
use std::path::Path;

/// Abbreviation to full tumor type name. Unknown abbreviations pass through.
#[derive(Debug, Clone, Default)]
pub struct TumorTypes {
    names: HashMap<String, String>,
}

impl TumorTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an `Abbreviation`/`TumorType` table.
    ///
    /// Rows that fail to parse are skipped with a warning.
    pub fn load(path: &Path) -> SourceResult<Self> {
        let mut names = HashMap::new();
        for row in DelimitedFile::new(path).rows()? {
            match row {
                Ok(row) => {
                    let abbreviation = row.text("Abbreviation");
                    let name = row.text("TumorType");
                    if !abbreviation.is_empty() && !name.is_empty() {
                        names.insert(abbreviation, name);
                    }
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping abbreviation row"),
            }
        }
        tracing::debug!(count = names.len(), "loaded tumor type abbreviations");
        Ok(Self { names })
    }

    pub fn insert(&mut self, abbreviation: impl Into<String>, name: impl Into<String>) {
        self.names.insert(abbreviation.into(), name.into());
    }

    pub fn resolve(&self, abbreviation: &str) -> String {
        self.names
            .get(abbreviation)
            .cloned()
            .unwrap_or_else(|| abbreviation.to_string())
    }

    pub fn resolve_all(&self, abbreviations: &[String]) -> Vec<String> {
        abbreviations.iter().map(|a| self.resolve(a)).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_abbreviation_passes_through() {
        let mut types = TumorTypes::new();
        types.insert("CML", "chronic myeloid leukaemia");
        assert_eq!(types.resolve("CML"), "chronic myeloid leukaemia");
        assert_eq!(types.resolve("GIST"), "GIST");
    }

    #[test]
    fn load_from_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abbreviations.tsv");
        std::fs::write(&path, "Abbreviation\tTumorType\nNSCLC\tnon small cell lung cancer\n\tempty\n").unwrap();
        let types = TumorTypes::load(&path).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(
            types.resolve_all(&["NSCLC".to_string(), "x".to_string()]),
            vec!["non small cell lung cancer", "x"]
        );
    }
}
