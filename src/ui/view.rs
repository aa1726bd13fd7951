use std::path::Path;

use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use super::theme::Theme;
use crate::app::Status;
use crate::fs::Item;
use crate::mode::Mode;

const TAB: &str = "    ";

/// What a region shows. The region decides where; the view decides what.
pub trait View {
  fn render(&self, size: Size, theme: &Theme) -> Text<'_>;
}

/// A window of a directory listing, one line per item.
pub struct ListingView<'a> {
  pub items: &'a [Item],
  pub offset: usize,
  pub name_width: usize,
}

impl View for ListingView<'_> {
  fn render(&self, size: Size, theme: &Theme) -> Text<'_> {
    self
      .items
      .iter()
      .skip(self.offset)
      .take(size.height as usize)
      .map(|item| Line::styled(item.display_line(self.name_width), theme.item_style(item.color())))
      .collect::<Vec<_>>()
      .into()
  }
}

/// Read-only file content.
pub struct ViewerView<'a> {
  pub content: &'a str,
}

impl View for ViewerView<'_> {
  fn render(&self, size: Size, theme: &Theme) -> Text<'_> {
    let style = Style::default().fg(theme.file);
    self
      .content
      .lines()
      .take(size.height as usize)
      .map(|line| Line::styled(line.replace('\t', TAB), style))
      .collect::<Vec<_>>()
      .into()
  }
}

/// Location, counts, mode and the last message.
pub struct HeaderView<'a> {
  pub path: &'a Path,
  pub entries: usize,
  pub row: usize,
  pub mode: Mode,
  pub status: Option<&'a Status>,
}

impl View for HeaderView<'_> {
  fn render(&self, _size: Size, theme: &Theme) -> Text<'_> {
    let dim = Style::default().fg(theme.text_dim);
    let mut lines = vec![
      Line::from(vec![
        Span::styled("rfd ", Style::default().fg(theme.directory)),
        Span::styled(self.path.display().to_string(), theme.title_style()),
      ]),
      Line::styled(format!("{} entries, row {}/{}", self.entries, self.row + 1, self.entries), dim),
      Line::styled(format!("mode: {}", self.mode.label()), dim),
    ];
    match self.status {
      Some(Status::Info(msg)) => lines.push(Line::styled(msg.clone(), Style::default().fg(theme.info))),
      Some(Status::Error(msg)) => lines.push(Line::styled(msg.clone(), Style::default().fg(theme.error))),
      None => {}
    }
    Text::from(lines)
  }
}
