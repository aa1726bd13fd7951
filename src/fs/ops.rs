use std::io;
use std::path::{Path, PathBuf};

use crate::error::BrowserError;

/// Where deleted entries go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trash {
  /// Entries are moved into this directory, created on first use.
  Directory(PathBuf),
  /// The desktop trash of the host OS.
  System,
}

impl Trash {
  /// `~/.local/share/rfd/trash` on Linux, the platform equivalent elsewhere.
  pub fn default_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("rfd").join("trash"))
  }

  /// Moves `path` out of its directory. Returns the new location when known.
  pub fn discard(&self, path: &Path) -> Result<Option<PathBuf>, BrowserError> {
    if is_directory_reference(path) {
      return Err(BrowserError::delete(
        path,
        io::Error::new(io::ErrorKind::InvalidInput, "refusing to trash a directory reference"),
      ));
    }
    match self {
      Trash::Directory(dir) => move_to_trash(path, dir)
        .map(Some)
        .map_err(|e| BrowserError::delete(path, e)),
      Trash::System => trash::delete(path)
        .map(|()| None)
        .map_err(|e| BrowserError::delete(path, io::Error::other(e.to_string()))),
    }
  }
}

/// `dir/.` and `dir/..` name the directory itself or its parent, never an entry.
fn is_directory_reference(path: &Path) -> bool {
  let raw = path.as_os_str().as_encoded_bytes();
  path.file_name().is_none() || raw == b"." || raw.ends_with(b"/.") || raw.ends_with(b"\\.")
}

/// Move a file or directory into `trash`, which is created if needed.
pub fn move_to_trash(path: &Path, trash: &Path) -> io::Result<PathBuf> {
  let file_name = path.file_name().ok_or_else(|| {
    io::Error::new(io::ErrorKind::InvalidInput, "path has no filename")
  })?;
  // Stat first so a missing source is reported before anything is created.
  std::fs::symlink_metadata(path)?;
  if trash_is_inside(path, trash)? {
    return Err(io::Error::new(
      io::ErrorKind::InvalidInput,
      format!("trash directory {} is inside the entry", trash.display()),
    ));
  }
  std::fs::create_dir_all(trash)?;

  // Timestamp prefix keeps repeated deletes of the same name apart
  let timestamp = std::time::SystemTime::now()
    .duration_since(std::time::UNIX_EPOCH)
    .map(|d| d.as_millis())
    .unwrap_or(0);
  let trash_path = trash.join(format!("{}.{}", timestamp, file_name.to_string_lossy()));

  match std::fs::rename(path, &trash_path) {
    Ok(()) => {}
    Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
      copy_path(path, &trash_path)?;
      delete_path(path)?;
    }
    Err(e) => return Err(e),
  }
  Ok(trash_path)
}

/// Whether `trash` is `path` itself or lies below it. The entry's last
/// component is not followed, so a symlink is judged as the link.
fn trash_is_inside(path: &Path, trash: &Path) -> io::Result<bool> {
  let entry = match (path.parent(), path.file_name()) {
    (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => parent.canonicalize()?.join(name),
    _ => std::env::current_dir()?.join(path),
  };
  Ok(canonicalize_existing(trash)?.starts_with(&entry))
}

/// Canonicalizes the longest existing prefix of `path` and appends the rest.
fn canonicalize_existing(path: &Path) -> io::Result<PathBuf> {
  let mut missing = Vec::new();
  let mut current = path;
  loop {
    match current.canonicalize() {
      Ok(base) => {
        let mut out = base;
        out.extend(missing.iter().rev());
        return Ok(out);
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        let (Some(parent), Some(name)) = (current.parent(), current.file_name()) else {
          return Err(e);
        };
        missing.push(name);
        current = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
      }
      Err(e) => return Err(e),
    }
  }
}

fn delete_path(path: &Path) -> io::Result<()> {
  if std::fs::symlink_metadata(path)?.is_dir() {
    std::fs::remove_dir_all(path)
  } else {
    std::fs::remove_file(path)
  }
}

/// Copies `source` to `dest`. Symlinks are copied as links, never followed.
fn copy_path(source: &Path, dest: &Path) -> io::Result<()> {
  let file_type = std::fs::symlink_metadata(source)?.file_type();
  if file_type.is_symlink() {
    copy_link(source, dest)
  } else if file_type.is_dir() {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(source)? {
      let entry = entry?;
      copy_path(&entry.path(), &dest.join(entry.file_name()))?;
    }
    Ok(())
  } else {
    std::fs::copy(source, dest)?;
    Ok(())
  }
}

#[cfg(unix)]
fn copy_link(source: &Path, dest: &Path) -> io::Result<()> {
  std::os::unix::fs::symlink(std::fs::read_link(source)?, dest)
}

#[cfg(not(unix))]
fn copy_link(source: &Path, dest: &Path) -> io::Result<()> {
  std::fs::copy(source, dest).map(|_| ())
}
