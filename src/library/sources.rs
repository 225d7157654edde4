use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::storage::Repository;
use crate::emphasis::split_affixes;
use crate::error::{GlanceError, Result};

/// Provides already-extracted raw text for a library item
pub trait TextSource {
    fn get_content(&self, item_id: Uuid) -> Result<String>;
}

impl<R: Repository> TextSource for R {
    fn get_content(&self, item_id: Uuid) -> Result<String> {
        Ok(self.get_item(item_id)?.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub definition: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Looks up the meaning of a word seen in `context`
pub trait DefinitionLookup {
    fn define(&self, word: &str, context: &str) -> Result<Definition>;
}

/// Offline word list loaded from a JSON object of `word -> definition`.
///
/// Keys are matched case-insensitively. The reading context is appended as
/// an example after any examples stored in the glossary.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    entries: HashMap<String, Definition>,
}

impl Glossary {
    pub fn new(entries: HashMap<String, Definition>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(word, def)| (word.to_lowercase(), def))
                .collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries: HashMap<String, Definition> = serde_json::from_str(&content)?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DefinitionLookup for Glossary {
    fn define(&self, word: &str, context: &str) -> Result<Definition> {
        let key = headword(word).to_lowercase();
        match self.entries.get(&key) {
            Some(found) => {
                debug!("glossary hit for {key:?}");
                let mut def = found.clone();
                if !context.is_empty() && !def.examples.iter().any(|e| e == context) {
                    def.examples.push(context.to_string());
                }
                Ok(def)
            }
            None => {
                warn!("no glossary entry for {key:?}");
                Err(GlanceError::DefinitionNotFound(key))
            }
        }
    }
}

/// The word inside a token, without surrounding punctuation
pub fn headword(token: &str) -> &str {
    let (_, core, _) = split_affixes(token);
    core
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{LibraryItem, MemoryRepository};
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    fn glossary() -> Glossary {
        let mut entries = HashMap::new();
        entries.insert(
            "Ephemeral".to_string(),
            Definition {
                definition: "lasting a very short time".to_string(),
                examples: vec!["ephemeral fame".to_string()],
            },
        );
        Glossary::new(entries)
    }

    #[test]
    fn test_define_strips_punctuation_and_case() {
        let def = glossary()
            .define("\"EPHEMERAL,\"", "an ephemeral joy")
            .unwrap();
        assert_eq!(def.definition, "lasting a very short time");
        assert_eq!(def.examples, vec!["ephemeral fame", "an ephemeral joy"]);
    }

    #[test]
    fn test_define_missing_word() {
        assert_matches!(
            glossary().define("ubiquitous", ""),
            Err(GlanceError::DefinitionNotFound(w)) if w == "ubiquitous"
        );
    }

    #[test]
    fn test_glossary_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glossary.json");
        fs::write(
            &path,
            r#"{"terse": {"definition": "brief"}, "lucid": {"examples": ["plain"]}}"#,
        )
        .unwrap();

        let g = Glossary::from_file(&path).unwrap();
        assert_eq!(g.len(), 2);
        assert!(g.define("terse", "").unwrap().examples.is_empty());
    }

    #[test]
    fn test_text_source_for_repository() {
        let item = LibraryItem::new("t".into(), "body text".into());
        let id = item.id;
        let repo = MemoryRepository::new(vec![item]);
        assert_eq!(repo.get_content(id).unwrap(), "body text");
        assert_matches!(
            repo.get_content(Uuid::new_v4()),
            Err(GlanceError::ItemNotFound(_))
        );
    }

    #[test]
    fn test_headword() {
        assert_eq!(headword("(word)."), "word");
        assert_eq!(headword("--"), "");
    }
}
