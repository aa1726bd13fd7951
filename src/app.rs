use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::config::Config;
use crate::error::BrowserError;
use crate::event::{Event, map_key};
use crate::fs::Listing;
use crate::mode::{Mode, Transition};
use crate::navigator::{Navigator, Outcome};
use crate::ui::{Decoration, Geometry, HeaderView, RegionId, RegionTree, Screen, ViewerView};

const HEADER_HEIGHT: u16 = 6;

/// Last message shown in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Info(String),
  Error(String),
}

struct Viewer {
  region: RegionId,
  path: PathBuf,
  content: String,
  return_row: usize,
}

/// Header and main region placement for a `width` x `height` terminal.
pub fn layout(width: u16, height: u16) -> (Geometry, Geometry) {
  let inner_width = width.saturating_sub(2);
  let header = Geometry::new(1, 1, HEADER_HEIGHT, inner_width);
  let main = Geometry::new(HEADER_HEIGHT + 2, 1, height.saturating_sub(HEADER_HEIGHT + 3), inner_width);
  (header, main)
}

/// The session: owns the screen, routes keys, and switches between the
/// listing and the viewer.
pub struct App<S: Screen> {
  regions: RegionTree<S>,
  header: RegionId,
  navigator: Navigator,
  mode: Mode,
  viewer: Option<Viewer>,
  status: Option<Status>,
  should_quit: bool,
}

impl<S: Screen> App<S> {
  pub fn new(screen: S, listing: Listing, config: &Config) -> Result<Self> {
    let area = screen.area();
    let (header_geometry, main_geometry) = layout(area.width, area.height);

    let mut regions = RegionTree::new(screen, config.theme.clone());
    let root = regions.root();
    let header = regions.open(root, header_geometry, Decoration::Bordered)?;
    let main = regions.open(root, main_geometry, Decoration::Bordered)?;
    let navigator = Navigator::new(listing, main, config.name_width, config.trash.clone());

    let mut app = Self {
      regions,
      header,
      navigator,
      mode: Mode::Navigation,
      viewer: None,
      status: None,
      should_quit: false,
    };
    app.navigator.render(&mut app.regions)?;
    app.finish_frame()?;
    Ok(app)
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }

  pub fn navigator(&self) -> &Navigator {
    &self.navigator
  }

  pub fn status(&self) -> Option<&Status> {
    self.status.as_ref()
  }

  pub fn viewer_region(&self) -> Option<RegionId> {
    self.viewer.as_ref().map(|v| v.region)
  }

  pub fn regions(&self) -> &RegionTree<S> {
    &self.regions
  }

  /// Shows startup problems (config errors and the like) in the header.
  pub fn show_errors(&mut self, errors: &[String]) -> Result<()> {
    if errors.is_empty() {
      return Ok(());
    }
    for e in errors {
      warn!(target: "session", error = %e, "startup");
    }
    self.status = Some(Status::Error(errors.join("; ")));
    self.finish_frame()
  }

  pub fn handle_event(&mut self, event: Event) -> Result<()> {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize(w, h) => self.resize(w, h),
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
    let action = map_key(key, self.mode);
    self.update(action)
  }

  pub fn update(&mut self, action: Action) -> Result<()> {
    if !action.allowed_in(self.mode) {
      if action != Action::None {
        debug!(target: "session", ?action, mode = ?self.mode, "ignored");
      }
      return Ok(());
    }

    self.status = None;
    match action {
      Action::Quit => {
        info!(target: "session", "quit");
        self.should_quit = true;
        return Ok(());
      }
      Action::Back => self.close_viewer()?,
      Action::View => self.open_viewer()?,
      other => {
        let outcome = self.navigator.dispatch(other, &mut self.regions)?;
        self.apply(outcome)?;
      }
    }
    self.finish_frame()
  }

  pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
    let (header_geometry, main_geometry) = layout(width, height);
    self.regions.reshape(self.header, header_geometry)?;
    self.regions.reshape(self.navigator.region(), main_geometry)?;
    if let Some(viewer) = &self.viewer {
      self.regions.reshape(viewer.region, main_geometry)?;
    }
    self.regions.resize(width, height)?;

    match &self.viewer {
      Some(viewer) => {
        let view = ViewerView { content: &viewer.content };
        self.regions.draw_view(viewer.region, &view)?;
      }
      None => self.navigator.render(&mut self.regions)?,
    }
    self.finish_frame()
  }

  fn apply(&mut self, outcome: Outcome) -> Result<()> {
    match outcome {
      Outcome::Done => {}
      Outcome::OpenViewer => self.open_viewer()?,
      Outcome::Deleted(name) => self.status = Some(Status::Info(format!("moved {name} to trash"))),
      Outcome::Failed(err) => self.report(err),
    }
    Ok(())
  }

  fn report(&mut self, err: BrowserError) {
    warn!(target: "session", path = %err.path().display(), error = %err, "command failed");
    self.status = Some(Status::Error(err.to_string()));
  }

  /// Loads the selected file and shows it over the listing. Nothing changes
  /// if the file cannot be read.
  fn open_viewer(&mut self) -> Result<()> {
    let Some(next) = self.mode.apply(Transition::View) else {
      return Ok(());
    };
    let Some(item) = self.navigator.current_item() else {
      return Ok(());
    };
    let path = item.path().to_path_buf();
    let content = match item.read() {
      Ok(content) => content,
      Err(e) => {
        self.report(e);
        return Ok(());
      }
    };

    let geometry = self.regions.geometry(self.navigator.region())?;
    let root = self.regions.root();
    let region = self.regions.open(root, geometry, Decoration::Plain)?;
    if let Err(e) = self.regions.draw_view(region, &ViewerView { content: &content }) {
      self.regions.close(region)?;
      return Err(e);
    }

    info!(target: "session", path = %path.display(), bytes = content.len(), "viewing");
    self.viewer = Some(Viewer {
      region,
      path,
      content,
      return_row: self.navigator.row(),
    });
    self.mode = next;
    Ok(())
  }

  fn close_viewer(&mut self) -> Result<()> {
    let Some(next) = self.mode.apply(Transition::Back) else {
      return Ok(());
    };
    self.mode = next;
    let Some(viewer) = self.viewer.take() else {
      return Ok(());
    };
    self.regions.close(viewer.region)?;
    info!(target: "session", path = %viewer.path.display(), "closed viewer");
    let outcome = self.navigator.reload(viewer.return_row, &mut self.regions)?;
    self.apply(outcome)
  }

  fn finish_frame(&mut self) -> Result<()> {
    let listing = self.navigator.listing();
    let view = HeaderView {
      path: listing.current_path(),
      entries: listing.len(),
      row: self.navigator.row(),
      mode: self.mode,
      status: self.status.as_ref(),
    };
    self.regions.draw_view(self.header, &view)?;

    match &self.viewer {
      Some(viewer) => self.regions.move_cursor_to(viewer.region, 0),
      None => self.navigator.place_cursor(&mut self.regions),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use crossterm::event::{KeyCode, KeyEventKind, KeyEventState, KeyModifiers};
  use ratatui::layout::Position;
  use tempfile::TempDir;

  use super::*;
  use crate::fs::Trash;
  use crate::ui::screen::MemoryScreen;

  struct Session {
    dir: TempDir,
    _trash: TempDir,
    app: App<MemoryScreen>,
  }

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
      code,
      modifiers: KeyModifiers::NONE,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  /// `..`, `.`, `a.txt` (10 bytes) and `sub/`.
  fn session() -> Session {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "0123456789").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("inner.txt"), "inner").unwrap();
    let trash = tempfile::tempdir().unwrap();
    let config = Config {
      trash: Trash::Directory(trash.path().join("bin")),
      ..Config::default()
    };
    let listing = Listing::open(dir.path()).unwrap();
    let app = App::new(MemoryScreen::new(80, 24), listing, &config).unwrap();
    Session { dir, _trash: trash, app }
  }

  fn select(s: &mut Session, name: &str) {
    let target = s.app.navigator().listing().position(name).unwrap();
    while s.app.navigator().row() != target {
      s.app.update(Action::MoveDown).unwrap();
    }
  }

  #[test]
  fn test_layout() {
    let (header, main) = layout(80, 24);
    assert_eq!(header, Geometry::new(1, 1, 6, 78));
    assert_eq!(main, Geometry::new(8, 1, 15, 78));
  }

  #[test]
  fn test_layout_tiny_terminal() {
    let (_, main) = layout(1, 3);
    assert_eq!(main.width, 0);
    assert_eq!(main.height, 0);
  }

  #[test]
  fn test_startup_screen() {
    let s = session();
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert!(s.app.viewer_region().is_none());
    assert_eq!(s.app.regions().open_count(), 3);
    let screen = s.app.regions().screen();
    assert!(screen.row_text(1).contains(&s.dir.path().display().to_string()));
    assert!(screen.contains("a.txt"));
    assert_eq!(screen.cursor, Position::new(1, 8));
  }

  #[test]
  fn test_view_and_back_scenario() {
    let mut s = session();
    select(&mut s, "a.txt");
    let row = s.app.navigator().row();

    s.app.update(Action::SelectOrEnter).unwrap();
    assert_eq!(s.app.mode(), Mode::Viewing);
    let viewer = s.app.viewer_region().unwrap();
    assert!(s.app.regions().is_open(viewer));
    assert!(s.app.regions().screen().row_text(8).starts_with("│0123456789 "));
    assert!(!s.app.regions().screen().contains("a.txt"));
    assert_eq!(s.app.regions().screen().cursor, Position::new(1, 8));

    s.app.update(Action::Back).unwrap();
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert!(s.app.viewer_region().is_none());
    assert!(!s.app.regions().is_open(viewer));
    assert_eq!(s.app.navigator().row(), row);
    assert!(s.app.regions().screen().contains("a.txt"));
  }

  #[test]
  fn test_view_command() {
    let mut s = session();
    select(&mut s, "a.txt");
    s.app.update(Action::View).unwrap();
    assert_eq!(s.app.mode(), Mode::Viewing);
  }

  #[test]
  fn test_back_restores_top_when_row_vanished() {
    let mut s = session();
    select(&mut s, "a.txt");
    s.app.update(Action::View).unwrap();
    fs::remove_file(s.dir.path().join("a.txt")).unwrap();
    fs::remove_dir_all(s.dir.path().join("sub")).unwrap();

    s.app.update(Action::Back).unwrap();
    assert_eq!(s.app.navigator().listing().len(), 2);
    assert_eq!(s.app.navigator().row(), 0);
  }

  #[test]
  fn test_enter_directory_scenario() {
    let mut s = session();
    select(&mut s, "sub");
    s.app.update(Action::SelectOrEnter).unwrap();
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert_eq!(s.app.navigator().listing().current_path(), s.dir.path().join("sub"));
    assert_eq!(s.app.navigator().row(), 0);
    assert!(s.app.regions().screen().contains("inner.txt"));
    let shown = s.dir.path().join("sub").display().to_string();
    assert!(s.app.regions().screen().row_text(1).contains(&shown));
  }

  #[test]
  fn test_failed_read_stays_in_navigation() {
    let mut s = session();
    select(&mut s, "a.txt");
    fs::remove_file(s.dir.path().join("a.txt")).unwrap();

    s.app.update(Action::SelectOrEnter).unwrap();
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert!(s.app.viewer_region().is_none());
    assert_eq!(s.app.regions().open_count(), 3);
    assert!(matches!(s.app.status(), Some(Status::Error(msg)) if msg.starts_with("cannot read")));
    assert!(s.app.regions().screen().contains("cannot read"));
  }

  #[test]
  fn test_navigation_commands_ignored_while_viewing() {
    let mut s = session();
    select(&mut s, "a.txt");
    let row = s.app.navigator().row();
    s.app.update(Action::View).unwrap();

    for action in [Action::MoveDown, Action::MoveUp, Action::SelectOrEnter, Action::View, Action::Delete] {
      s.app.update(action).unwrap();
      assert_eq!(s.app.mode(), Mode::Viewing);
    }
    assert_eq!(s.app.navigator().row(), row);
    assert!(s.dir.path().join("a.txt").exists());
    assert_eq!(s.app.regions().open_count(), 4);
  }

  #[test]
  fn test_back_ignored_while_navigating() {
    let mut s = session();
    s.app.update(Action::MoveDown).unwrap();
    let refreshes = s.app.regions().screen().refreshes;
    s.app.update(Action::Back).unwrap();
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert_eq!(s.app.navigator().row(), 1);
    assert_eq!(s.app.regions().screen().refreshes, refreshes);
  }

  #[test]
  fn test_quit_from_either_mode() {
    let mut s = session();
    s.app.update(Action::Quit).unwrap();
    assert!(s.app.should_quit());

    let mut s = session();
    select(&mut s, "a.txt");
    s.app.update(Action::View).unwrap();
    s.app.update(Action::Quit).unwrap();
    assert!(s.app.should_quit());
    assert_eq!(s.app.mode(), Mode::Viewing);
  }

  #[test]
  fn test_keys_drive_session() {
    let mut s = session();
    s.app.handle_key(key(KeyCode::Char('j'))).unwrap();
    assert_eq!(s.app.navigator().row(), 1);
    s.app.handle_key(key(KeyCode::Char('k'))).unwrap();
    assert_eq!(s.app.navigator().row(), s.app.navigator().listing().len() - 1);

    select(&mut s, "a.txt");
    s.app.handle_key(key(KeyCode::Enter)).unwrap();
    assert_eq!(s.app.mode(), Mode::Viewing);
    s.app.handle_key(key(KeyCode::Char('j'))).unwrap();
    assert_eq!(s.app.mode(), Mode::Viewing);
    s.app.handle_key(key(KeyCode::Backspace)).unwrap();
    assert_eq!(s.app.mode(), Mode::Navigation);
    s.app.handle_key(key(KeyCode::Char('q'))).unwrap();
    assert!(s.app.should_quit());
  }

  #[test]
  fn test_delete_reports_success() {
    let mut s = session();
    select(&mut s, "a.txt");
    s.app.update(Action::Delete).unwrap();
    assert!(s.app.navigator().listing().position("a.txt").is_none());
    assert_eq!(s.app.status(), Some(&Status::Info("moved a.txt to trash".to_string())));
    assert!(s.app.regions().screen().contains("moved a.txt to trash"));
  }

  #[test]
  fn test_delete_failure_is_reported() {
    let mut s = session();
    s.app.update(Action::Delete).unwrap();
    assert!(matches!(s.app.status(), Some(Status::Error(msg)) if msg.starts_with("cannot move")));
    assert_eq!(s.app.mode(), Mode::Navigation);
    assert!(!s.app.should_quit());
  }

  #[test]
  fn test_status_cleared_by_next_command() {
    let mut s = session();
    s.app.update(Action::Delete).unwrap();
    assert!(s.app.status().is_some());
    s.app.update(Action::MoveDown).unwrap();
    assert!(s.app.status().is_none());
  }

  #[test]
  fn test_show_errors() {
    let mut s = session();
    s.app.show_errors(&["bad theme".to_string()]).unwrap();
    assert!(s.app.regions().screen().contains("bad theme"));
    assert_eq!(s.app.regions().screen().cursor, Position::new(1, 8));
  }

  #[test]
  fn test_resize_redraws_listing() {
    let mut s = session();
    s.app.resize(60, 20).unwrap();
    let screen = s.app.regions().screen();
    assert_eq!(screen.row_text(0).chars().count(), 60);
    assert!(screen.contains("a.txt"));
    assert_eq!(screen.cursor, Position::new(1, 8));
  }

  #[test]
  fn test_resize_while_viewing_keeps_content() {
    let mut s = session();
    select(&mut s, "a.txt");
    s.app.update(Action::View).unwrap();
    s.app.resize(60, 20).unwrap();
    assert!(s.app.regions().screen().contains("0123456789"));
    assert_eq!(s.app.mode(), Mode::Viewing);
  }
}
