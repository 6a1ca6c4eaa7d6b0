//! End-to-end conversation flows through the controller.

use std::time::{Duration, Instant};

use tokio::sync::oneshot;

use mediq_engine::{
    App, DEFAULT_GREETING_DELAY, DEFAULT_THINKING_DELAY, KnowledgeStore, LoadError, MediqConfig,
    Speaker,
};

fn store_with(entries: &[(&str, &str)]) -> KnowledgeStore {
    let records = entries
        .iter()
        .map(|(name, description)| {
            (
                (*name).to_string(),
                mediq_engine::ConditionRecord {
                    description: (*description).to_string(),
                    treatment: "treatment".to_string(),
                    medications: "medications".to_string(),
                    seek_attention: vec!["warning sign".to_string()],
                },
            )
        })
        .collect();
    KnowledgeStore::from_entries(records)
}

/// Drive a fresh app through startup with the given load outcome.
fn start_app(outcome: Result<KnowledgeStore, LoadError>, now: Instant) -> App {
    let (tx, rx) = oneshot::channel();
    let mut app = App::new(&MediqConfig::default(), rx);
    tx.send(outcome).expect("receiver alive");
    app.tick(now);
    app.tick(now + DEFAULT_GREETING_DELAY);
    app
}

/// Submit text and tick past the thinking delay, returning the reply text.
fn ask(app: &mut App, text: &str, at: Instant) -> String {
    app.submit_text(text, at);
    app.tick(at + DEFAULT_THINKING_DELAY);
    app.transcript()
        .last()
        .expect("reply turn")
        .payload()
        .to_plain_text()
}

fn read_error() -> LoadError {
    LoadError::Read {
        path: "absent.json".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    }
}

#[test]
fn greeting_then_condition_reply() {
    let now = Instant::now();
    let mut app = start_app(
        Ok(store_with(&[("diabetes", "A chronic metabolic condition.")])),
        now,
    );

    let greeting = app.transcript()[0].payload().to_plain_text();
    assert!(greeting.contains("not a substitute for a real doctor"));

    let reply = ask(
        &mut app,
        "I have diabetes symptoms",
        now + DEFAULT_GREETING_DELAY + Duration::from_secs(1),
    );
    assert!(reply.contains("A chronic metabolic condition."));
    assert!(reply.contains("Treatment: treatment"));
    assert!(reply.contains("Common Medications: medications"));
    assert!(reply.contains("- warning sign"));
}

#[test]
fn symptom_pairs_get_canned_replies() {
    let now = Instant::now();
    let mut app = start_app(Ok(KnowledgeStore::empty()), now);
    let t = now + DEFAULT_GREETING_DELAY + Duration::from_secs(1);

    let reply = ask(&mut app, "fever and headache", t);
    assert!(reply.contains("flu or other viral infections"));

    let reply = ask(&mut app, "sore throat and cough", t + Duration::from_secs(5));
    assert!(reply.contains("common cold"));
}

#[test]
fn unknown_query_falls_back_with_four_links() {
    let now = Instant::now();
    let mut app = start_app(Ok(KnowledgeStore::empty()), now);

    let reply = ask(
        &mut app,
        "xyz123unknown",
        now + DEFAULT_GREETING_DELAY + Duration::from_secs(1),
    );
    assert!(reply.contains("\"xyz123unknown\""));
    for name in ["WebMD.com", "MedlinePlus.gov", "Drugs.com", "rxlist.com"] {
        assert!(reply.contains(name), "missing link {name}");
    }
}

#[test]
fn failed_load_degrades_but_keeps_chatting() {
    let now = Instant::now();
    let mut app = start_app(Err(read_error()), now);

    assert!(app.is_degraded());
    // Notice first, then greeting, both before any user turn.
    assert_eq!(app.transcript().len(), 2);
    assert!(
        app.transcript()
            .iter()
            .all(|turn| turn.speaker() == Speaker::Assistant)
    );

    let reply = ask(
        &mut app,
        "diabetes",
        now + DEFAULT_GREETING_DELAY + Duration::from_secs(1),
    );
    assert!(reply.contains("trusted resources"));
}

#[test]
fn whitespace_submission_changes_nothing() {
    let now = Instant::now();
    let mut app = start_app(Ok(KnowledgeStore::empty()), now);
    let before = app.transcript().len();

    app.submit_text("   ", now + DEFAULT_GREETING_DELAY + Duration::from_secs(1));
    app.tick(now + DEFAULT_GREETING_DELAY + Duration::from_secs(5));

    assert_eq!(app.transcript().len(), before);
    assert!(!app.is_thinking());
    assert!(app.suggestions().is_some());
}

#[test]
fn transcript_order_survives_a_burst_of_submissions() {
    let now = Instant::now();
    let mut app = start_app(
        Ok(store_with(&[
            ("diabetes", "first description"),
            ("acne", "second description"),
        ])),
        now,
    );
    let t = now + DEFAULT_GREETING_DELAY + Duration::from_secs(1);

    app.submit_text("diabetes", t);
    app.submit_text("acne", t + Duration::from_millis(50));
    app.submit_text("something else", t + Duration::from_millis(100));
    app.tick(t + Duration::from_millis(100) + DEFAULT_THINKING_DELAY);

    let texts: Vec<String> = app
        .transcript()
        .iter()
        .map(|turn| turn.payload().to_plain_text())
        .collect();

    // Greeting, the three user turns in submission order, then the three
    // replies in the same order: queued replies never reorder.
    let speakers: Vec<Speaker> = app.transcript().iter().map(|t| t.speaker()).collect();
    assert_eq!(
        speakers,
        [
            Speaker::Assistant,
            Speaker::User,
            Speaker::User,
            Speaker::User,
            Speaker::Assistant,
            Speaker::Assistant,
            Speaker::Assistant,
        ]
    );
    assert_eq!(texts[1], "diabetes");
    assert_eq!(texts[2], "acne");
    assert_eq!(texts[3], "something else");
    assert!(texts[4].contains("first description"));
    assert!(texts[5].contains("second description"));
    assert!(texts[6].contains("trusted resources"));
}
