//! Input handling for the Mediq TUI.
//!
//! Crossterm events are read on a blocking thread and forwarded over a
//! bounded channel, so the render loop never blocks on the terminal and a
//! burst of events cannot starve a frame.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;

use mediq_engine::App;

// Short poll so the reader notices the stop flag quickly.
const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25);
const INPUT_CHANNEL_CAPACITY: usize = 1024;
const MAX_EVENTS_PER_FRAME: usize = 64;

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Background reader for terminal events.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(&stop_flag, &tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so the reader thread unblocks if it is
        // backpressured on a send.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
        tracing::debug!("input pump shut down");
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if the caller exits early; never block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: &Arc<AtomicBool>, tx: &mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued events and apply them to the app. Returns `true` when the
/// user asked to quit.
pub fn handle_events(app: &mut App, pump: &mut InputPump) -> Result<bool> {
    let now = Instant::now();
    for _ in 0..MAX_EVENTS_PER_FRAME {
        let msg = match pump.rx.try_recv() {
            Ok(msg) => msg,
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input thread terminated"));
            }
        };
        match msg {
            InputMsg::Event(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key, now) {
                    return Ok(true);
                }
            }
            InputMsg::Event(Event::Paste(text)) => {
                for c in text.chars() {
                    let c = if c == '\n' || c == '\r' { ' ' } else { c };
                    if !c.is_control() {
                        app.input_mut().enter_char(c);
                    }
                }
            }
            InputMsg::Event(_) => {}
            InputMsg::Error(err) => return Err(anyhow!("input error: {err}")),
        }
    }
    Ok(false)
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => {
                app.quit();
                return true;
            }
            KeyCode::Char('h') => {
                app.toggle_help();
                return false;
            }
            _ => return false,
        }
    }

    // Alt+1..5 selects a suggestion chip.
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let index = (c as usize) - ('1' as usize);
            app.submit_suggestion(index, now);
        }
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            app.quit();
            return true;
        }
        KeyCode::Enter => app.submit_input(now),
        KeyCode::Backspace => app.input_mut().delete_char(),
        KeyCode::Left => app.input_mut().move_cursor_left(),
        KeyCode::Right => app.input_mut().move_cursor_right(),
        KeyCode::Home => app.input_mut().move_cursor_home(),
        KeyCode::End => app.input_mut().move_cursor_end(),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::PageUp => app.scroll_up(10),
        KeyCode::PageDown => app.scroll_down(10),
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::Char(c) => app.input_mut().enter_char(c),
        _ => {}
    }
    false
}
