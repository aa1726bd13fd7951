use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::mode::Mode;

pub enum Event {
  Key(KeyEvent),
  Resize(u16, u16),
}

/// Blocks until the next key press or resize. Everything else is dropped.
pub fn read_event() -> Result<Event> {
  loop {
    match event::read()? {
      CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => return Ok(Event::Key(key)),
      CrosstermEvent::Resize(w, h) => return Ok(Event::Resize(w, h)),
      _ => {}
    }
  }
}

/// Fixed key map per mode. Keys with no meaning in `mode` map to [`Action::None`].
pub fn map_key(key: KeyEvent, mode: Mode) -> Action {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    return match key.code {
      KeyCode::Char('c') => Action::Quit,
      _ => Action::None,
    };
  }

  match mode {
    Mode::Navigation => match key.code {
      KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
      KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
      KeyCode::Enter => Action::SelectOrEnter,
      KeyCode::Char('v') => Action::View,
      KeyCode::Char('d') => Action::Delete,
      KeyCode::Char('q') => Action::Quit,
      _ => Action::None,
    },
    Mode::Viewing => match key.code {
      KeyCode::Backspace | KeyCode::Esc => Action::Back,
      KeyCode::Char('q') => Action::Quit,
      _ => Action::None,
    },
  }
}
