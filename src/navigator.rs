use anyhow::Result;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::error::BrowserError;
use crate::fs::{Item, Listing, Trash};
use crate::ui::{ListingView, RegionId, RegionTree, Screen};

/// What the session has to do after the navigator handled a command.
#[derive(Debug)]
pub enum Outcome {
  Done,
  OpenViewer,
  Deleted(String),
  Failed(BrowserError),
}

/// Cursor and directory listing shown in the main region.
pub struct Navigator {
  listing: Listing,
  row: usize,
  scroll: usize,
  region: RegionId,
  name_width: usize,
  trash: Trash,
}

impl Navigator {
  pub fn new(listing: Listing, region: RegionId, name_width: usize, trash: Trash) -> Self {
    Self { listing, row: 0, scroll: 0, region, name_width, trash }
  }

  pub fn listing(&self) -> &Listing {
    &self.listing
  }

  pub fn row(&self) -> usize {
    self.row
  }

  pub fn region(&self) -> RegionId {
    self.region
  }

  pub fn current_item(&self) -> Option<&Item> {
    self.listing.get(self.row)
  }

  pub fn dispatch<S: Screen>(&mut self, action: Action, regions: &mut RegionTree<S>) -> Result<Outcome> {
    match action {
      Action::MoveUp => {
        self.move_up();
        self.place_cursor(regions)?;
        Ok(Outcome::Done)
      }
      Action::MoveDown => {
        self.move_down();
        self.place_cursor(regions)?;
        Ok(Outcome::Done)
      }
      Action::SelectOrEnter => self.select_or_enter(regions),
      Action::View => Ok(Outcome::OpenViewer),
      Action::Delete => self.delete(regions),
      Action::Back | Action::Quit | Action::None => Ok(Outcome::Done),
    }
  }

  /// Steps up one row. Reaching row 0 (or going below it) wraps to the last row.
  pub fn move_up(&mut self) {
    let len = self.listing.len();
    if len == 0 {
      return;
    }
    self.row = if self.row <= 1 { len - 1 } else { self.row - 1 };
    debug!(target: "navigator", row = self.row, "move_up");
  }

  pub fn move_down(&mut self) {
    let len = self.listing.len();
    if len == 0 {
      return;
    }
    self.row += 1;
    if self.row >= len {
      self.row = 0;
    }
    debug!(target: "navigator", row = self.row, "move_down");
  }

  fn select_or_enter<S: Screen>(&mut self, regions: &mut RegionTree<S>) -> Result<Outcome> {
    let Some(item) = self.current_item() else {
      return Ok(Outcome::Done);
    };
    if !item.is_dir() {
      return Ok(Outcome::OpenViewer);
    }
    let target = item.path().to_path_buf();
    if let Err(e) = self.listing.list(&target) {
      return Ok(Outcome::Failed(e));
    }
    self.row = 0;
    self.scroll = 0;
    self.render(regions)?;
    Ok(Outcome::Done)
  }

  fn delete<S: Screen>(&mut self, regions: &mut RegionTree<S>) -> Result<Outcome> {
    let Some(item) = self.current_item() else {
      return Ok(Outcome::Done);
    };
    let path = item.path().to_path_buf();
    let dir = item.dir().to_path_buf();
    let name = item.name().to_string();

    let trashed = self.trash.discard(&path);
    if let Ok(dest) = &trashed {
      info!(target: "navigator", dir = %dir.display(), name = %name, dest = ?dest, "moved to trash");
    }
    let refreshed = self.refresh(self.row);
    self.render(regions)?;

    Ok(match (trashed, refreshed) {
      (Err(e), Err(refresh_err)) => {
        warn!(target: "navigator", error = %refresh_err, "refresh after failed delete");
        Outcome::Failed(e)
      }
      (Err(e), Ok(())) | (Ok(_), Err(e)) => Outcome::Failed(e),
      (Ok(_), Ok(())) => Outcome::Deleted(name),
    })
  }

  /// Re-lists the current directory and redraws, keeping `row` when it is still in range.
  pub fn reload<S: Screen>(&mut self, row: usize, regions: &mut RegionTree<S>) -> Result<Outcome> {
    let refreshed = self.refresh(row);
    self.render(regions)?;
    Ok(match refreshed {
      Ok(()) => Outcome::Done,
      Err(e) => Outcome::Failed(e),
    })
  }

  fn refresh(&mut self, row: usize) -> Result<(), BrowserError> {
    self.listing.refresh()?;
    self.row = if row < self.listing.len() { row } else { 0 };
    Ok(())
  }

  /// Draws the visible part of the listing and puts the cursor on the selected row.
  pub fn render<S: Screen>(&mut self, regions: &mut RegionTree<S>) -> Result<()> {
    let height = regions.geometry(self.region)?.height as usize;
    self.adjust_scroll(height);
    let view = ListingView {
      items: self.listing.items(),
      offset: self.scroll,
      name_width: self.name_width,
    };
    regions.draw_view(self.region, &view)?;
    self.move_cursor(regions)
  }

  /// Moves the cursor to the selected row, scrolling the listing if the row is off screen.
  pub fn place_cursor<S: Screen>(&mut self, regions: &mut RegionTree<S>) -> Result<()> {
    let height = regions.geometry(self.region)?.height as usize;
    if self.adjust_scroll(height) {
      self.render(regions)
    } else {
      self.move_cursor(regions)
    }
  }

  fn move_cursor<S: Screen>(&self, regions: &mut RegionTree<S>) -> Result<()> {
    let row = u16::try_from(self.row.saturating_sub(self.scroll)).unwrap_or(u16::MAX);
    regions.move_cursor_to(self.region, row)
  }

  fn adjust_scroll(&mut self, height: usize) -> bool {
    let before = self.scroll;
    if height == 0 || self.row < self.scroll {
      self.scroll = self.row;
    } else if self.row >= self.scroll + height {
      self.scroll = self.row + 1 - height;
    }
    before != self.scroll
  }
}
