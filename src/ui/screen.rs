use std::io::{self, Stdout};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// The terminal as the region tree sees it: a cell buffer in absolute
/// coordinates, a cursor, and a refresh that makes both visible.
pub trait Screen {
  fn area(&self) -> Rect;

  fn buffer_mut(&mut self) -> &mut Buffer;

  fn set_cursor(&mut self, position: Position);

  fn refresh(&mut self) -> Result<()>;

  fn resize(&mut self, area: Rect);

  fn clear(&mut self, area: Rect) {
    let area = area.intersection(self.area());
    Clear.render(area, self.buffer_mut());
  }

  fn put_text(&mut self, area: Rect, text: Text<'_>) {
    let area = area.intersection(self.area());
    Paragraph::new(text).render(area, self.buffer_mut());
  }

  fn draw_box(&mut self, area: Rect, style: Style) {
    let area = area.intersection(self.area());
    if area.width < 2 || area.height < 2 {
      return;
    }
    Block::default().borders(Borders::ALL).border_style(style).render(area, self.buffer_mut());
  }
}

/// Screen backed by the real terminal through crossterm.
pub struct TerminalScreen {
  terminal: Terminal<CrosstermBackend<Stdout>>,
  buffer: Buffer,
  cursor: Position,
}

impl TerminalScreen {
  pub fn new() -> Result<Self> {
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let size = terminal.size()?;
    Ok(Self {
      terminal,
      buffer: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
      cursor: Position::ORIGIN,
    })
  }
}

impl Screen for TerminalScreen {
  fn area(&self) -> Rect {
    self.buffer.area
  }

  fn buffer_mut(&mut self) -> &mut Buffer {
    &mut self.buffer
  }

  fn set_cursor(&mut self, position: Position) {
    self.cursor = position;
  }

  fn refresh(&mut self) -> Result<()> {
    let buffer = &self.buffer;
    let cursor = self.cursor;
    self.terminal.draw(|frame| {
      let area = buffer.area.intersection(frame.area());
      let target = frame.buffer_mut();
      for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
          target[(x, y)] = buffer[(x, y)].clone();
        }
      }
      frame.set_cursor_position(cursor);
    })?;
    Ok(())
  }

  fn resize(&mut self, area: Rect) {
    self.buffer.resize(area);
  }
}

/// In-memory screen for headless tests.
#[cfg(test)]
pub struct MemoryScreen {
  pub buffer: Buffer,
  pub cursor: Position,
  pub refreshes: usize,
}

#[cfg(test)]
impl MemoryScreen {
  pub fn new(width: u16, height: u16) -> Self {
    Self {
      buffer: Buffer::empty(Rect::new(0, 0, width, height)),
      cursor: Position::ORIGIN,
      refreshes: 0,
    }
  }

  /// One screen row as a string, trailing blanks removed.
  pub fn row_text(&self, y: u16) -> String {
    let area = self.buffer.area;
    let mut s = String::new();
    for x in area.left()..area.right() {
      s.push_str(self.buffer[(x, y)].symbol());
    }
    s.trim_end().to_string()
  }

  pub fn contains(&self, needle: &str) -> bool {
    let area = self.buffer.area;
    (area.top()..area.bottom()).any(|y| self.row_text(y).contains(needle))
  }
}

#[cfg(test)]
impl Screen for MemoryScreen {
  fn area(&self) -> Rect {
    self.buffer.area
  }

  fn buffer_mut(&mut self) -> &mut Buffer {
    &mut self.buffer
  }

  fn set_cursor(&mut self, position: Position) {
    self.cursor = position;
  }

  fn refresh(&mut self) -> Result<()> {
    self.refreshes += 1;
    Ok(())
  }

  fn resize(&mut self, area: Rect) {
    self.buffer.resize(area);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_put_text_clips_to_area() {
    let mut screen = MemoryScreen::new(10, 3);
    screen.put_text(Rect::new(2, 1, 4, 1), Text::from("abcdefgh\nsecond"));
    assert_eq!(screen.row_text(0), "");
    assert_eq!(screen.row_text(1), "  abcd");
    assert_eq!(screen.row_text(2), "");
  }

  #[test]
  fn test_draw_box_frames_area() {
    let mut screen = MemoryScreen::new(5, 3);
    screen.draw_box(Rect::new(0, 0, 5, 3), Style::default());
    assert_eq!(screen.row_text(0), "┌───┐");
    assert_eq!(screen.row_text(1), "│   │");
    assert_eq!(screen.row_text(2), "└───┘");
  }

  #[test]
  fn test_clear_blanks_cells() {
    let mut screen = MemoryScreen::new(6, 1);
    screen.put_text(Rect::new(0, 0, 6, 1), Text::from("xxxxxx"));
    screen.clear(Rect::new(1, 0, 3, 1));
    assert_eq!(screen.row_text(0), "x   xx");
  }

  #[test]
  fn test_out_of_bounds_is_clipped() {
    let mut screen = MemoryScreen::new(4, 2);
    screen.put_text(Rect::new(2, 1, 10, 10), Text::from("hello"));
    screen.draw_box(Rect::new(3, 1, 10, 10), Style::default());
    assert_eq!(screen.row_text(1), "  he");
  }
}
