use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

use crate::shutdown::ShutdownSignal;

/// Keys understood while tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NewSession,
}

/// Watch the keyboard on a background thread
///
/// `Quit` keys trigger `shutdown` directly; every recognised key is also
/// sent on the returned channel. The thread exits once shutdown is set.
pub fn spawn_keyboard_monitor(shutdown: Arc<ShutdownSignal>) -> Receiver<KeyAction> {
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !shutdown.is_shutdown() {
            if event::poll(Duration::from_millis(100)).unwrap_or(false)
                && let Ok(Event::Key(key_event)) = event::read()
                && let Some(action) = key_action(&key_event)
            {
                debug!("Key {:?} -> {:?}", key_event.code, action);
                if action == KeyAction::Quit {
                    shutdown.trigger();
                }
                if sender.send(action).is_err() {
                    break;
                }
            }
        }

        debug!("Keyboard monitor stopped");
    });

    receiver
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    match event.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(KeyAction::Quit)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(KeyAction::NewSession),
        _ => None,
    }
}
