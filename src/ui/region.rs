use anyhow::{Result, bail};
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Text;

use super::screen::Screen;
use super::theme::Theme;
use super::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(usize);

/// Placement of a region's content area, relative to its parent's content origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
  pub row: u16,
  pub col: u16,
  pub height: u16,
  pub width: u16,
}

impl Geometry {
  pub fn new(row: u16, col: u16, height: u16, width: u16) -> Self {
    Self { row, col, height, width }
  }

  pub fn size(&self) -> Size {
    Size::new(self.width, self.height)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
  Plain,
  /// One-cell frame drawn just outside the content area.
  Bordered,
}

#[derive(Debug)]
struct Node {
  parent: Option<RegionId>,
  geometry: Geometry,
  decoration: Decoration,
}

/// Rectangular regions of one screen, arranged as a tree under a root that
/// covers the whole terminal.
///
/// Each region only knows its offset inside its parent. Cursor placement and
/// drawing walk up the parent chain, adding one offset per step, and only the
/// root's position reaches the [`Screen`].
pub struct RegionTree<S: Screen> {
  screen: S,
  theme: Theme,
  nodes: Vec<Option<Node>>,
}

impl<S: Screen> RegionTree<S> {
  /// Takes over `screen` and frames its edges.
  pub fn new(screen: S, theme: Theme) -> Self {
    let area = screen.area();
    let root = Node {
      parent: None,
      geometry: Geometry::new(0, 0, area.height, area.width),
      decoration: Decoration::Plain,
    };
    let mut tree = Self { screen, theme, nodes: vec![Some(root)] };
    tree.frame_root();
    tree
  }

  pub fn root(&self) -> RegionId {
    RegionId(0)
  }

  pub fn screen(&self) -> &S {
    &self.screen
  }

  pub fn is_open(&self, id: RegionId) -> bool {
    self.nodes.get(id.0).is_some_and(Option::is_some)
  }

  pub fn open_count(&self) -> usize {
    self.nodes.iter().flatten().count()
  }

  pub fn geometry(&self, id: RegionId) -> Result<Geometry> {
    Ok(self.node(id)?.geometry)
  }

  /// Allocates a child of `parent`. A bordered region draws its frame right away.
  pub fn open(&mut self, parent: RegionId, geometry: Geometry, decoration: Decoration) -> Result<RegionId> {
    self.node(parent)?;
    let node = Node { parent: Some(parent), geometry, decoration };
    let id = match self.nodes.iter().position(Option::is_none) {
      Some(slot) => {
        self.nodes[slot] = Some(node);
        RegionId(slot)
      }
      None => {
        self.nodes.push(Some(node));
        RegionId(self.nodes.len() - 1)
      }
    };
    self.decorate(id)?;
    Ok(id)
  }

  /// Releases `id` and everything below it, blanking the cells they covered.
  pub fn close(&mut self, id: RegionId) -> Result<()> {
    if id == self.root() {
      bail!("the root region cannot be closed");
    }
    let children: Vec<RegionId> = self
      .nodes
      .iter()
      .enumerate()
      .filter(|(_, node)| node.as_ref().is_some_and(|n| n.parent == Some(id)))
      .map(|(i, _)| RegionId(i))
      .collect();
    for child in children {
      self.close(child)?;
    }

    let area = self.outer_area(id)?;
    self.screen.clear(area);
    self.nodes[id.0] = None;
    Ok(())
  }

  pub fn reshape(&mut self, id: RegionId, geometry: Geometry) -> Result<()> {
    self.node_mut(id)?.geometry = geometry;
    Ok(())
  }

  /// Writes `text` at the region's origin, clipped to its area, and refreshes.
  pub fn draw(&mut self, id: RegionId, text: Text<'_>) -> Result<()> {
    let area = self.area(id)?;
    self.screen.clear(area);
    self.screen.put_text(area, text);
    self.screen.set_cursor(Position::new(area.x, area.y));
    self.screen.refresh()
  }

  pub fn draw_view(&mut self, id: RegionId, view: &dyn View) -> Result<()> {
    let size = self.geometry(id)?.size();
    let text = view.render(size, &self.theme);
    self.draw(id, text)
  }

  /// Puts the terminal cursor on `row` of region `id`, column 0.
  pub fn move_cursor_to(&mut self, id: RegionId, row: u16) -> Result<()> {
    let position = self.to_root(id, Position::new(0, row))?;
    self.screen.set_cursor(position);
    self.screen.refresh()
  }

  /// Follows a terminal resize: the root takes the new area, every frame is redrawn.
  pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
    let area = Rect::new(0, 0, width, height);
    self.screen.resize(area);
    self.screen.clear(area);
    self.reshape(self.root(), Geometry::new(0, 0, height, width))?;
    self.frame_root();
    let open: Vec<RegionId> = (1..self.nodes.len()).map(RegionId).filter(|id| self.is_open(*id)).collect();
    for id in open {
      self.decorate(id)?;
    }
    Ok(())
  }

  /// Absolute content area of `id`.
  pub fn area(&self, id: RegionId) -> Result<Rect> {
    let geometry = self.geometry(id)?;
    let origin = self.to_root(id, Position::ORIGIN)?;
    Ok(Rect::new(origin.x, origin.y, geometry.width, geometry.height))
  }

  fn to_root(&self, id: RegionId, local: Position) -> Result<Position> {
    let mut position = local;
    let mut current = id;
    loop {
      let node = self.node(current)?;
      position.x = position.x.saturating_add(node.geometry.col);
      position.y = position.y.saturating_add(node.geometry.row);
      match node.parent {
        Some(parent) => current = parent,
        None => return Ok(position),
      }
    }
  }

  fn outer_area(&self, id: RegionId) -> Result<Rect> {
    let area = self.area(id)?;
    Ok(match self.node(id)?.decoration {
      Decoration::Plain => area,
      Decoration::Bordered => {
        let left = area.x.saturating_sub(1);
        let top = area.y.saturating_sub(1);
        let right = area.right().saturating_add(1);
        let bottom = area.bottom().saturating_add(1);
        Rect::new(left, top, right - left, bottom - top)
      }
    })
  }

  fn decorate(&mut self, id: RegionId) -> Result<()> {
    if self.node(id)?.decoration == Decoration::Bordered {
      let outer = self.outer_area(id)?;
      let style = self.theme.border_style();
      self.screen.draw_box(outer, style);
    }
    Ok(())
  }

  fn frame_root(&mut self) {
    let area = self.screen.area();
    let style = self.theme.border_style();
    self.screen.draw_box(area, style);
  }

  fn node(&self, id: RegionId) -> Result<&Node> {
    match self.nodes.get(id.0) {
      Some(Some(node)) => Ok(node),
      _ => bail!("region {id:?} is not open"),
    }
  }

  fn node_mut(&mut self, id: RegionId) -> Result<&mut Node> {
    match self.nodes.get_mut(id.0) {
      Some(Some(node)) => Ok(node),
      _ => bail!("region {id:?} is not open"),
    }
  }
}
