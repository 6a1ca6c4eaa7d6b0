//! Knowledge document loading against real files.

use mediq_engine::{KnowledgeStore, LoadError, MatchResult, match_input};

const DOCUMENT: &str = r#"{
    "Diabetes": {
        "description": "Diabetes is a chronic condition that affects how your body turns food into energy.",
        "treatment": "Healthy eating, regular activity, and blood sugar monitoring.",
        "medications": "Metformin, insulin as prescribed.",
        "seekAttention": [
            "Very high or very low blood sugar readings",
            "Confusion or fainting",
            "Wounds that will not heal"
        ]
    },
    "Common Cold": {
        "description": "The common cold is a mild viral infection of the nose and throat.",
        "treatment": "Rest, fluids, and over-the-counter symptom relief.",
        "medications": "Decongestants, pain relievers.",
        "seekAttention": ["Fever above 39C", "Symptoms lasting more than ten days"]
    }
}"#;

fn write_document(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("conditions.json");
    std::fs::write(&path, contents).expect("write document");
    path
}

#[tokio::test]
async fn loads_a_well_formed_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_document(&dir, DOCUMENT);

    let store = KnowledgeStore::load(&path).await.expect("load");
    assert_eq!(store.len(), 2);

    let names: Vec<&str> = store.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["diabetes", "common cold"]);

    let result = match_input("I have diabetes symptoms", &store);
    let MatchResult::Condition { name, record } = result else {
        panic!("expected condition match, got {result:?}");
    };
    assert_eq!(name, "diabetes");
    assert_eq!(record.seek_attention.len(), 3);
}

#[tokio::test]
async fn load_failures_are_typed() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = KnowledgeStore::load(dir.path().join("absent.json")).await;
    assert!(matches!(missing, Err(LoadError::Read { .. })));

    let path = write_document(&dir, "][");
    let malformed = KnowledgeStore::load(&path).await;
    assert!(matches!(malformed, Err(LoadError::Parse { .. })));
}

#[tokio::test]
async fn shipped_document_parses() {
    // The document bundled with the repository must always load.
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("data")
        .join("conditions.json");
    let store = KnowledgeStore::load(&path).await.expect("bundled document");
    assert!(!store.is_empty());
}
