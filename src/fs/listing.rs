use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use super::item::Item;
use crate::error::BrowserError;

/// Entries of one directory, in the order the OS enumerates them.
///
/// The listing always starts with the `.` and `..` references, so it is never empty.
/// It is replaced wholesale on every `list`/`refresh`; a failed listing leaves the
/// previous snapshot in place.
#[derive(Debug)]
pub struct Listing {
  current: PathBuf,
  items: Vec<Item>,
}

impl Listing {
  pub fn open(path: &Path) -> Result<Self, BrowserError> {
    let current = resolve_path(path)?;
    let items = enumerate(&current)?;
    info!(target: "listing", path = %current.display(), entries = items.len(), "opened");
    Ok(Self { current, items })
  }

  pub fn current_path(&self) -> &Path {
    &self.current
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn get(&self, index: usize) -> Option<&Item> {
    self.items.get(index)
  }

  pub fn position(&self, name: &str) -> Option<usize> {
    self.items.iter().position(|item| item.name() == name)
  }

  /// Lists `path` and makes it the current directory.
  pub fn list(&mut self, path: &Path) -> Result<&[Item], BrowserError> {
    let target = resolve_path(path)?;
    let items = enumerate(&target)?;
    info!(target: "listing", path = %target.display(), entries = items.len(), "changed directory");
    self.current = target;
    self.items = items;
    Ok(&self.items)
  }

  /// Re-enumerates the current directory.
  pub fn refresh(&mut self) -> Result<&[Item], BrowserError> {
    let items = enumerate(&self.current)?;
    debug!(target: "listing", path = %self.current.display(), entries = items.len(), "refreshed");
    self.items = items;
    Ok(&self.items)
  }
}

fn enumerate(dir: &Path) -> Result<Vec<Item>, BrowserError> {
  let read_dir = fs::read_dir(dir).map_err(|e| BrowserError::directory_access(dir, e))?;
  let mut items = vec![Item::new(dir, "."), Item::new(dir, "..")];
  for entry in read_dir {
    let entry = entry.map_err(|e| BrowserError::directory_access(dir, e))?;
    items.push(Item::new(dir, entry.file_name()));
  }
  Ok(items)
}

/// Expands `~` and makes `path` absolute against the process working directory.
pub fn resolve_path(path: &Path) -> Result<PathBuf, BrowserError> {
  let cwd = std::env::current_dir().map_err(|e| BrowserError::directory_access(path, e))?;
  let home = dirs::home_dir();
  Ok(expand_path(path, &cwd, home.as_deref()))
}

/// Lexical path expansion: no symlinks are followed and nothing is touched on disk.
pub fn expand_path(path: &Path, cwd: &Path, home: Option<&Path>) -> PathBuf {
  let expanded = match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  };
  let absolute = if expanded.is_absolute() { expanded } else { cwd.join(expanded) };

  let mut out = PathBuf::new();
  for component in absolute.components() {
    match component {
      Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
      Component::CurDir => {}
      Component::ParentDir => {
        if out.parent().is_some() {
          out.pop();
        }
      }
      Component::Normal(name) => out.push(name),
    }
  }
  out
}
