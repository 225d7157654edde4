use assert_matches::assert_matches;
use chrono::{DateTime, Duration, Utc};
use glance::library::{JsonLibraryStore, LibraryItem, Repository, VocabularyEntry};
use glance::retention::{grade_named, Rating, ReviewSession};
use glance::GlanceError;
use tempfile::TempDir;

fn store(dir: &TempDir) -> JsonLibraryStore {
    JsonLibraryStore::with_path(dir.path().join("library.json"))
}

fn entry(word: &str, definition: &str, added: DateTime<Utc>) -> VocabularyEntry {
    VocabularyEntry::new(word.into(), definition.into(), vec![], added)
}

#[test]
fn review_grades_due_entries_and_persists_them() {
    let dir = TempDir::new().unwrap();
    let library = store(&dir);
    let now = Utc::now();

    let mut item = LibraryItem::new("essay".into(), "a lucid and terse essay".into());
    let lucid = entry("lucid", "clear", now - Duration::days(2));
    let terse = entry("terse", "brief", now - Duration::days(1));
    let essay = VocabularyEntry {
        next_review: now + Duration::days(3),
        ..VocabularyEntry::new("essay".into(), "short piece".into(), vec![], now)
    };
    item.vocabulary = vec![lucid.clone(), terse.clone(), essay.clone()];
    library.add_item(item.clone()).unwrap();

    let owned = library.all_vocabulary().unwrap();
    let entries: Vec<VocabularyEntry> = owned.into_iter().map(|(_, e)| e).collect();
    let mut session = ReviewSession::new(&entries, now);
    assert_eq!(session.remaining(), 2);

    // most recently saved first
    assert_eq!(session.current().map(|e| e.word.as_str()), Some("terse"));
    let graded = session.answer(Rating::Easy, now).unwrap();
    library.replace_vocabulary_entry(item.id, graded).unwrap();

    let graded = session.answer(Rating::Hard, now).unwrap();
    library.replace_vocabulary_entry(item.id, graded).unwrap();
    assert!(session.is_done());
    assert_eq!(session.reviewed(), 2);

    let stored = library.get_item(item.id).unwrap();
    let find = |word: &str| {
        stored
            .vocabulary
            .iter()
            .find(|e| e.word == word)
            .cloned()
            .unwrap()
    };
    assert_eq!(find("terse").proficiency, 2);
    assert_eq!(find("terse").next_review, now + Duration::minutes(4_320));
    assert_eq!(find("lucid").proficiency, 0);
    assert_eq!(find("lucid").next_review, now + Duration::minutes(10));
    assert_eq!(find("essay"), essay);

    // nothing left until the hard interval passes
    let entries: Vec<VocabularyEntry> = stored.vocabulary.clone();
    assert!(ReviewSession::new(&entries, now).is_done());
    let later = now + Duration::minutes(10);
    assert_eq!(ReviewSession::new(&entries, later).remaining(), 1);
}

#[test]
fn review_rejects_unknown_rating() {
    let entry = VocabularyEntry::new("lucid".into(), "clear".into(), vec![], Utc::now());
    assert_matches!(
        grade_named(&entry, "medium", Utc::now()),
        Err(GlanceError::InvalidArgument(_))
    );
}

#[test]
fn replacing_unknown_entry_fails() {
    let dir = TempDir::new().unwrap();
    let library = store(&dir);
    let item = LibraryItem::new("essay".into(), "text".into());
    library.add_item(item.clone()).unwrap();

    let stray = VocabularyEntry::new("stray".into(), String::new(), vec![], Utc::now());
    assert_matches!(
        library.replace_vocabulary_entry(item.id, stray),
        Err(GlanceError::EntryNotFound(_))
    );
}
