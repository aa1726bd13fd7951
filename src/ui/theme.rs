use ratatui::style::{Color, Modifier, Style};

use crate::fs::ColorClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
  pub directory: Color,
  pub file: Color,
  pub background: Color,
  pub border: Color,
  pub title: Color,
  pub text_dim: Color,
  pub info: Color,
  pub error: Color,
}

impl Theme {
  pub fn dark() -> Self {
    Self {
      directory: Color::Cyan,
      file: Color::White,
      background: Color::Black,
      border: Color::Indexed(240),
      title: Color::Indexed(252),
      text_dim: Color::DarkGray,
      info: Color::Indexed(150),
      error: Color::Indexed(167),
    }
  }

  pub fn light() -> Self {
    Self {
      directory: Color::Blue,
      file: Color::Black,
      background: Color::White,
      border: Color::Indexed(250),
      title: Color::Indexed(235),
      text_dim: Color::Indexed(243),
      info: Color::Indexed(30),
      error: Color::Indexed(124),
    }
  }

  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "dark" => Some(Self::dark()),
      "light" => Some(Self::light()),
      _ => None,
    }
  }

  pub fn available_themes() -> &'static [&'static str] {
    &["dark", "light"]
  }

  pub fn item_style(&self, class: ColorClass) -> Style {
    let fg = match class {
      ColorClass::Directory => self.directory,
      ColorClass::RegularFile => self.file,
    };
    Style::default().fg(fg).bg(self.background)
  }

  pub fn border_style(&self) -> Style {
    Style::default().fg(self.border)
  }

  pub fn title_style(&self) -> Style {
    Style::default().fg(self.title).add_modifier(Modifier::BOLD)
  }
}

impl Default for Theme {
  fn default() -> Self {
    Self::dark()
  }
}
