use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::fs::Trash;
use crate::fs::listing::resolve_path;
use crate::ui::Theme;

pub const DEFAULT_NAME_WIDTH: usize = 43;
pub const MAX_NAME_WIDTH: usize = 1024;

#[derive(Debug, Clone)]
pub struct Config {
  pub name_width: usize,
  pub theme: Theme,
  pub trash: Trash,
  pub log_level: String,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  trash: Option<TrashConfig>,
  log: Option<LogConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  name_width: Option<usize>,
  theme: Option<String>,
}

#[derive(Deserialize, Default)]
struct TrashConfig {
  dir: Option<String>,
  system: Option<bool>,
}

#[derive(Deserialize, Default)]
struct LogConfig {
  level: Option<String>,
}

impl Default for Config {
  fn default() -> Self {
    let trash_dir = Trash::default_dir().unwrap_or_else(|| std::env::temp_dir().join("rfd-trash"));
    Self {
      name_width: DEFAULT_NAME_WIDTH,
      theme: Theme::default(),
      trash: Trash::Directory(trash_dir),
      log_level: "info".to_string(),
    }
  }
}

impl Config {
  pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rfd").join("config.toml"))
  }

  /// Directory holding `rfd.log`.
  pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("rfd"))
  }

  /// Reads the user config. A missing file yields defaults; problems are
  /// returned as messages next to a usable config.
  pub fn load() -> (Config, Vec<String>) {
    match Self::config_path() {
      Some(path) => Self::load_from(&path),
      None => (Config::default(), Vec::new()),
    }
  }

  pub fn load_from(path: &Path) -> (Config, Vec<String>) {
    match std::fs::read_to_string(path) {
      Ok(s) => Self::load_from_str(&s),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => (Config::default(), Vec::new()),
      Err(e) => (Config::default(), vec![format!("failed to read {}: {e}", path.display())]),
    }
  }

  pub fn load_from_str(s: &str) -> (Config, Vec<String>) {
    let mut config = Config::default();
    let mut errors = Vec::new();
    config.apply_toml_str(s, &mut errors);
    (config, errors)
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general {
      match general.name_width {
        Some(0) => errors.push("name_width must be at least 1".to_string()),
        Some(width) if width > MAX_NAME_WIDTH => {
          errors.push(format!("name_width {width} is too large, using {MAX_NAME_WIDTH}"));
          self.name_width = MAX_NAME_WIDTH;
        }
        Some(width) => self.name_width = width,
        None => {}
      }
      if let Some(name) = general.theme {
        match Theme::from_name(&name) {
          Some(theme) => self.theme = theme,
          None => errors.push(format!(
            "unknown theme {name:?} (available: {})",
            Theme::available_themes().join(", ")
          )),
        }
      }
    }

    if let Some(trash) = toml_config.trash {
      if trash.system.unwrap_or(false) {
        self.trash = Trash::System;
      } else if let Some(dir) = trash.dir {
        let raw = PathBuf::from(&dir);
        self.trash = Trash::Directory(resolve_path(&raw).unwrap_or(raw));
      }
    }

    if let Some(log) = toml_config.log
      && let Some(level) = log.level
    {
      if level.parse::<tracing::Level>().is_ok() {
        self.log_level = level;
      } else {
        errors.push(format!("invalid log level: {level:?}"));
      }
    }
  }
}
