use std::cell::OnceCell;
use std::ffi::OsStr;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthChar;

use crate::error::BrowserError;

/// Size column for directories.
pub const DIR_LABEL: &str = "<DIR>";
/// Size column for entries whose metadata could not be read.
pub const UNKNOWN_LABEL: &str = "?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorClass {
  Directory,
  RegularFile,
}

/// One directory entry as seen by a single listing snapshot.
///
/// Metadata is fetched on first use and kept for the lifetime of the item;
/// a listing refresh builds new items instead of invalidating old ones.
#[derive(Debug)]
pub struct Item {
  dir: PathBuf,
  name: String,
  path: PathBuf,
  stat: OnceCell<io::Result<Metadata>>,
}

impl Item {
  pub fn new(dir: &Path, name: impl AsRef<OsStr>) -> Self {
    let name = name.as_ref();
    Self {
      dir: dir.to_path_buf(),
      name: name.to_string_lossy().to_string(),
      path: dir.join(name),
      stat: OnceCell::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn stat(&self) -> Result<&Metadata, BrowserError> {
    match self.stat.get_or_init(|| fs::metadata(&self.path)) {
      Ok(meta) => Ok(meta),
      Err(e) => Err(BrowserError::stat(&self.path, io::Error::new(e.kind(), e.to_string()))),
    }
  }

  pub fn is_directory(&self) -> Result<bool, BrowserError> {
    self.stat().map(|m| m.is_dir())
  }

  /// Like [`Item::is_directory`], treating an unreadable entry as a plain file.
  pub fn is_dir(&self) -> bool {
    self.is_directory().unwrap_or(false)
  }

  pub fn color(&self) -> ColorClass {
    if self.is_dir() {
      ColorClass::Directory
    } else {
      ColorClass::RegularFile
    }
  }

  pub fn size(&self) -> Result<String, BrowserError> {
    let meta = self.stat()?;
    if meta.is_dir() {
      Ok(DIR_LABEL.to_string())
    } else {
      Ok(meta.len().to_string())
    }
  }

  pub fn size_label(&self) -> String {
    self.size().unwrap_or_else(|_| UNKNOWN_LABEL.to_string())
  }

  /// Full file content, decoded lossily so binary files still open.
  pub fn read(&self) -> Result<String, BrowserError> {
    if self.is_dir() {
      return Err(BrowserError::read(
        &self.path,
        io::Error::new(io::ErrorKind::IsADirectory, "is a directory"),
      ));
    }
    let bytes = fs::read(&self.path).map_err(|e| BrowserError::read(&self.path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
  }

  /// Name fitted to `name_width` columns, immediately followed by the size label.
  pub fn display_line(&self, name_width: usize) -> String {
    let mut line = fit_width(&self.name, name_width);
    line.push_str(&self.size_label());
    line
  }
}

/// Pads or truncates `s` to exactly `width` terminal columns.
pub fn fit_width(s: &str, width: usize) -> String {
  let mut out = String::with_capacity(width);
  let mut used = 0;
  for c in s.chars() {
    let w = c.width().unwrap_or(0);
    if used + w > width {
      break;
    }
    out.push(c);
    used += w;
  }
  out.extend(std::iter::repeat_n(' ', width - used));
  out
}
