mod geometry;
mod widget;
mod widgets;

pub use geometry::*;
pub use widget::*;
pub use widgets::*;
