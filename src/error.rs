use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures the browser reports to the user. None of them ends the session.
#[derive(Debug, Error)]
pub enum BrowserError {
  #[error("cannot open directory {}: {source}", path.display())]
  DirectoryAccess {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("cannot stat {}: {source}", path.display())]
  Stat {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("cannot read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("cannot move {} to trash: {source}", path.display())]
  Delete {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl BrowserError {
  pub fn directory_access(path: &Path, source: io::Error) -> Self {
    Self::DirectoryAccess { path: path.to_path_buf(), source }
  }

  pub fn stat(path: &Path, source: io::Error) -> Self {
    Self::Stat { path: path.to_path_buf(), source }
  }

  pub fn read(path: &Path, source: io::Error) -> Self {
    Self::Read { path: path.to_path_buf(), source }
  }

  pub fn delete(path: &Path, source: io::Error) -> Self {
    Self::Delete { path: path.to_path_buf(), source }
  }

  pub fn path(&self) -> &Path {
    match self {
      Self::DirectoryAccess { path, .. }
      | Self::Stat { path, .. }
      | Self::Read { path, .. }
      | Self::Delete { path, .. } => path,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_messages_name_the_path() {
    let err = BrowserError::read(Path::new("/tmp/a.txt"), io::Error::from(io::ErrorKind::NotFound));
    let msg = err.to_string();
    assert!(msg.starts_with("cannot read /tmp/a.txt"));
    assert_eq!(err.path(), Path::new("/tmp/a.txt"));
  }

  #[test]
  fn test_source_is_preserved() {
    use std::error::Error;
    let err = BrowserError::delete(
      Path::new("x"),
      io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "denied");
  }
}
