// Imported texts with their reading history and saved vocabulary.

mod models;
mod sources;
mod storage;

pub use models::{LibraryItem, VocabularyEntry};
pub use sources::{headword, Definition, DefinitionLookup, Glossary, TextSource};
pub use storage::{JsonLibraryStore, MemoryRepository, Repository};
