/// Interaction mode of the session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
  #[default]
  Navigation,
  Viewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
  View,
  Back,
}

impl Mode {
  /// The state after `transition`, or `None` when it does not apply in this mode.
  pub fn apply(self, transition: Transition) -> Option<Mode> {
    match (self, transition) {
      (Mode::Navigation, Transition::View) => Some(Mode::Viewing),
      (Mode::Viewing, Transition::Back) => Some(Mode::Navigation),
      _ => None,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Mode::Navigation => "NAV",
      Mode::Viewing => "VIEW",
    }
  }
}
