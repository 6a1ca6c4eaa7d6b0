//! Conversation engine for Mediq - state machine and orchestration.
//!
//! This crate contains the [`App`] controller without TUI dependencies. The
//! frontend drives it by forwarding user actions and calling [`App::tick`]
//! every frame; all delays are deadlines owned by the controller, so timers
//! are trivially cancellable and never overlap.

use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::oneshot;

mod config;
mod input;
mod knowledge;
mod matcher;
mod render;

pub use config::{
    ConfigError, DEFAULT_GREETING_DELAY, DEFAULT_KNOWLEDGE_PATH, DEFAULT_THINKING_DELAY,
    MediqConfig,
};
pub use input::DraftInput;
pub use knowledge::{KnowledgeStore, LoadError};
pub use matcher::{MatchResult, SYMPTOM_RULES, SymptomRule, match_input};
pub use render::{EXTERNAL_LINKS, render};

// Re-export domain types for the frontend's convenience.
pub use mediq_types::{
    ConditionRecord, DisplayBlock, DisplayPayload, EmptyStringError, ExternalLink, NonEmptyString,
    Speaker, Turn, sanitize_terminal_text,
};

/// Quick-reply prompts shown under the transcript.
pub const SUGGESTIONS: &[&str] = &[
    "Fever and headache",
    "Diabetes",
    "Common Cold",
    "Hypertension",
    "Acne",
];

const GREETING_INTRO: &str = "Hi there! I'm your Mediq medical assistant.";
const GREETING_HINT: &str =
    "You can ask me about symptoms or common conditions like \"Diabetes\" or \"Common Cold\".";
const GREETING_DISCLAIMER: &str = "Disclaimer: I am not a substitute for a real doctor. \
                                   Please consult a healthcare professional for medical advice.";
const DEGRADED_NOTICE: &str =
    "My knowledge base is currently unavailable. Please try again in a bit.";

/// In-flight knowledge load delivered over a oneshot channel.
///
/// The load is attempted exactly once at startup; input is accepted while it
/// is pending, and matching runs over whatever store state exists at call
/// time (empty is acceptable).
#[derive(Debug)]
enum LoadState {
    Pending(oneshot::Receiver<Result<KnowledgeStore, LoadError>>),
    Settled,
}

/// One-time startup phase.
///
/// `Initializing -> GreetingScheduled -> Ready`; the greeting deadline is
/// set when the load settles, regardless of its outcome.
#[derive(Debug, Clone, Copy)]
enum SessionPhase {
    Initializing,
    GreetingScheduled { due: Instant },
    Ready,
}

/// A submission waiting out its thinking delay.
///
/// Replies are processed strictly in FIFO order, one deadline each, so
/// rapid repeated submissions cannot interleave indicator states.
#[derive(Debug)]
struct PendingReply {
    query: String,
    due: Instant,
}

/// Conversation controller.
///
/// Owns the knowledge store, the append-only transcript, the draft input,
/// and every timer deadline. Single writer; no turn is ever mutated or
/// removed once appended.
#[derive(Debug)]
pub struct App {
    store: KnowledgeStore,
    degraded: bool,
    load: LoadState,
    phase: SessionPhase,
    transcript: Vec<Turn>,
    pending: VecDeque<PendingReply>,
    input: DraftInput,
    chips_visible: bool,
    help_visible: bool,
    should_quit: bool,
    scroll: u16,
    scroll_max: u16,
    high_contrast: bool,
    greeting_delay: Duration,
    thinking_delay: Duration,
    ticks: u64,
}

impl App {
    /// Build the controller around an in-flight knowledge load.
    ///
    /// The caller spawns the load task and hands over the receiving half;
    /// see [`KnowledgeStore::load`].
    #[must_use]
    pub fn new(
        config: &MediqConfig,
        load: oneshot::Receiver<Result<KnowledgeStore, LoadError>>,
    ) -> Self {
        Self {
            store: KnowledgeStore::empty(),
            degraded: false,
            load: LoadState::Pending(load),
            phase: SessionPhase::Initializing,
            transcript: Vec::new(),
            pending: VecDeque::new(),
            input: DraftInput::default(),
            chips_visible: false,
            help_visible: false,
            should_quit: false,
            scroll: 0,
            scroll_max: 0,
            high_contrast: config.high_contrast,
            greeting_delay: config.greeting_delay(),
            thinking_delay: config.thinking_delay(),
            ticks: 0,
        }
    }

    /// Advance all deadlines. Called once per frame.
    pub fn tick(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        self.poll_load(now);
        self.advance_greeting(now);
        self.advance_replies(now);
    }

    /// Submit the current draft input. Empty or whitespace-only drafts are
    /// silently ignored: no transition, no transcript entry.
    pub fn submit_input(&mut self, now: Instant) {
        let text = self.input.take_text();
        self.submit_text(text, now);
    }

    /// Submit text as a user turn (typed or via a suggestion chip).
    pub fn submit_text(&mut self, text: impl Into<String>, now: Instant) {
        let Ok(text) = NonEmptyString::new(text.into()) else {
            return; // EmptyInput is not an error
        };
        let query = sanitize_terminal_text(text.as_str().trim()).into_owned();

        self.transcript.push(Turn::user(
            DisplayPayload::paragraph(query.clone()),
            SystemTime::now(),
        ));
        self.chips_visible = false;
        self.scroll = 0;
        self.pending.push_back(PendingReply {
            query,
            due: now + self.thinking_delay,
        });
    }

    /// Submit suggestion chip `index`, if chips are currently shown.
    pub fn submit_suggestion(&mut self, index: usize, now: Instant) {
        if !self.chips_visible {
            return;
        }
        if let Some(text) = SUGGESTIONS.get(index) {
            self.submit_text(*text, now);
        }
    }

    fn poll_load(&mut self, now: Instant) {
        let LoadState::Pending(receiver) = &mut self.load else {
            return;
        };
        let outcome = match receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                tracing::warn!("Knowledge load task dropped without a result");
                self.enter_degraded_mode();
                self.settle_load(now);
                return;
            }
        };

        match outcome {
            Ok(store) => {
                tracing::info!(conditions = store.len(), "Knowledge base loaded");
                self.store = store;
            }
            Err(err) => {
                tracing::warn!("Failed to load knowledge base: {err}");
                self.enter_degraded_mode();
            }
        }
        self.settle_load(now);
    }

    /// Degraded mode: the store stays empty and every query falls back to
    /// external references. One notice, appended before any user turn.
    fn enter_degraded_mode(&mut self) {
        self.degraded = true;
        self.transcript.push(Turn::assistant(
            DisplayPayload::paragraph(DEGRADED_NOTICE),
            SystemTime::now(),
        ));
    }

    fn settle_load(&mut self, now: Instant) {
        self.load = LoadState::Settled;
        self.phase = SessionPhase::GreetingScheduled {
            due: now + self.greeting_delay,
        };
    }

    fn advance_greeting(&mut self, now: Instant) {
        let SessionPhase::GreetingScheduled { due } = self.phase else {
            return;
        };
        if now < due {
            return;
        }
        self.transcript.push(Turn::assistant(
            DisplayPayload::new(vec![
                DisplayBlock::Paragraph(GREETING_INTRO.to_string()),
                DisplayBlock::Paragraph(GREETING_HINT.to_string()),
                DisplayBlock::Emphasis(GREETING_DISCLAIMER.to_string()),
            ]),
            SystemTime::now(),
        ));
        self.chips_visible = true;
        self.phase = SessionPhase::Ready;
    }

    fn advance_replies(&mut self, now: Instant) {
        while self.pending.front().is_some_and(|reply| now >= reply.due) {
            let Some(reply) = self.pending.pop_front() else {
                break;
            };
            let result = matcher::match_input(&reply.query, &self.store);
            let payload = render::render(&result, &reply.query);
            self.transcript.push(Turn::assistant(payload, SystemTime::now()));
            self.scroll = 0;
        }
        if self.pending.is_empty() && matches!(self.phase, SessionPhase::Ready) {
            self.chips_visible = true;
        }
    }

    // --- accessors for the frontend ---

    #[must_use]
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Whether the typing indicator should be shown: a greeting or a reply
    /// deadline is outstanding.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        !self.pending.is_empty() || matches!(self.phase, SessionPhase::GreetingScheduled { .. })
    }

    /// The quick-reply prompts, when they should be displayed.
    #[must_use]
    pub fn suggestions(&self) -> Option<&'static [&'static str]> {
        self.chips_visible.then_some(SUGGESTIONS)
    }

    /// True once a failed load has put the session into degraded mode.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn input(&self) -> &DraftInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut DraftInput {
        &mut self.input
    }

    #[must_use]
    pub fn high_contrast(&self) -> bool {
        self.high_contrast
    }

    /// Frame counter, used to drive the typing-indicator animation.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    #[must_use]
    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    // --- scroll state (offset in lines from the bottom) ---

    #[must_use]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.scroll_max);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Called by the renderer once it knows how many lines overflow.
    pub fn update_scroll_max(&mut self, max: u16) {
        self.scroll_max = max;
        self.scroll = self.scroll.min(max);
    }
}
