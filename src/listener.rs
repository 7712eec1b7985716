//! Key listener — raw-mode crossterm events on a dedicated thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Poll interval; also bounds how long shutdown waits for the thread.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Events the listener thread reports to the toggle loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    /// The designated toggle key was pressed.
    Toggle,
    /// The user asked to bail out (q, Esc, Ctrl-C).
    Quit,
}

/// Parse a toggle-key name from config into a `KeyCode`.
///
/// Accepts a single letter or digit, or a named key ("space", "enter", "tab").
pub fn parse_toggle_key(name: &str) -> Result<KeyCode> {
    let token = name.trim();
    if token.len() == 1 {
        let ch = token.chars().next().context("empty toggle key")?;
        if ch.is_ascii_alphanumeric() {
            return Ok(KeyCode::Char(ch.to_ascii_lowercase()));
        }
    }
    match token.to_lowercase().as_str() {
        "space" => Ok(KeyCode::Char(' ')),
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        _ => anyhow::bail!("unknown toggle key: {name:?}"),
    }
}

/// Handle to the listener thread; restores the terminal on shutdown.
pub struct KeyListener {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Start the key-listener thread.
///
/// Puts the terminal into raw mode and reports presses of `toggle_key` (and
/// quit requests) over the returned channel. The thread blocks on OS key
/// events; nothing else runs on it.
pub fn spawn(toggle_key: KeyCode) -> Result<(mpsc::Receiver<ListenerEvent>, KeyListener)> {
    terminal::enable_raw_mode().context("failed to enable raw terminal mode")?;

    let (tx, rx) = mpsc::channel(8);
    let stop = Arc::new(AtomicBool::new(false));
    let stop_thread = Arc::clone(&stop);

    let handle = std::thread::Builder::new()
        .name("key-listener".into())
        .spawn(move || {
            while !stop_thread.load(Ordering::SeqCst) {
                let pending = match event::poll(POLL_INTERVAL) {
                    Ok(pending) => pending,
                    Err(e) => {
                        warn!("key event poll failed: {e}");
                        break;
                    }
                };
                if !pending {
                    continue;
                }
                let ev = match event::read() {
                    Ok(ev) => ev,
                    Err(e) => {
                        warn!("key event read failed: {e}");
                        break;
                    }
                };
                let Event::Key(key) = ev else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let code = normalize(key.code);
                let msg = if code == toggle_key {
                    ListenerEvent::Toggle
                } else if is_quit(code, key.modifiers) {
                    ListenerEvent::Quit
                } else {
                    continue; // all other keys are ignored in all states
                };

                let quit = msg == ListenerEvent::Quit;
                if tx.blocking_send(msg).is_err() || quit {
                    break;
                }
            }
        })
        .context("failed to spawn key-listener thread")?;

    Ok((
        rx,
        KeyListener {
            stop,
            handle: Some(handle),
        },
    ))
}

impl KeyListener {
    /// Stop the thread and restore the terminal.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("key-listener thread panicked");
            }
            if let Err(e) = terminal::disable_raw_mode() {
                warn!("failed to restore terminal mode: {e}");
            }
            info!("key listener stopped");
        }
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    matches!(code, KeyCode::Esc | KeyCode::Char('q'))
        || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_named_keys() {
        assert_eq!(parse_toggle_key("space").unwrap(), KeyCode::Char(' '));
        assert_eq!(parse_toggle_key("Enter").unwrap(), KeyCode::Enter);
        assert_eq!(parse_toggle_key("TAB").unwrap(), KeyCode::Tab);
    }

    #[test]
    fn parse_single_characters() {
        assert_eq!(parse_toggle_key("r").unwrap(), KeyCode::Char('r'));
        assert_eq!(parse_toggle_key("R").unwrap(), KeyCode::Char('r'));
        assert_eq!(parse_toggle_key("5").unwrap(), KeyCode::Char('5'));
    }

    #[test]
    fn parse_unknown_key_errors() {
        assert!(parse_toggle_key("banana").is_err());
        assert!(parse_toggle_key("").is_err());
    }

    #[test]
    fn ctrl_c_is_quit() {
        assert!(is_quit(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!is_quit(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(is_quit(KeyCode::Esc, KeyModifiers::NONE));
    }
}
