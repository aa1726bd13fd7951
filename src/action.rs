use crate::mode::Mode;

/// Commands the session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  MoveUp,
  MoveDown,
  SelectOrEnter,
  View,
  Delete,
  Back,
  Quit,
  None,
}

impl Action {
  pub const ALL: [Action; 8] = [
    Action::MoveUp,
    Action::MoveDown,
    Action::SelectOrEnter,
    Action::View,
    Action::Delete,
    Action::Back,
    Action::Quit,
    Action::None,
  ];

  /// Whether the command does anything in `mode`. Illegal commands are ignored, not errors.
  pub fn allowed_in(self, mode: Mode) -> bool {
    match self {
      Action::Quit => true,
      Action::Back => mode == Mode::Viewing,
      Action::MoveUp | Action::MoveDown | Action::SelectOrEnter | Action::View | Action::Delete => {
        mode == Mode::Navigation
      }
      Action::None => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_quit_is_legal_everywhere() {
    assert!(Action::Quit.allowed_in(Mode::Navigation));
    assert!(Action::Quit.allowed_in(Mode::Viewing));
  }

  #[test]
  fn test_back_only_while_viewing() {
    assert!(Action::Back.allowed_in(Mode::Viewing));
    assert!(!Action::Back.allowed_in(Mode::Navigation));
  }

  #[test]
  fn test_navigation_commands_only_while_navigating() {
    for action in [Action::MoveUp, Action::MoveDown, Action::SelectOrEnter, Action::View, Action::Delete] {
      assert!(action.allowed_in(Mode::Navigation), "{action:?}");
      assert!(!action.allowed_in(Mode::Viewing), "{action:?}");
    }
  }

  #[test]
  fn test_every_action_has_a_home() {
    for action in Action::ALL {
      let legal_somewhere = action.allowed_in(Mode::Navigation) || action.allowed_in(Mode::Viewing);
      assert_eq!(legal_somewhere, action != Action::None, "{action:?}");
    }
  }
}
