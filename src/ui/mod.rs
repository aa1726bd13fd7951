pub mod region;
pub mod screen;
pub mod theme;
pub mod view;

pub use region::{Decoration, Geometry, RegionId, RegionTree};
pub use screen::{Screen, TerminalScreen};
pub use theme::Theme;
pub use view::{HeaderView, ListingView, View, ViewerView};
