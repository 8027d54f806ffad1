//! Geometric entities making up a layered sheet of paper: triangular
//! panels, quad crease strips, and the sheet aggregating them.

pub use self::crease::{CornerAnchor, Crease, CreaseCorner};
pub use self::panel::{sorted_clockwise, Panel, PanelVertex};
pub use self::sheet::Sheet;

mod crease;
mod panel;
mod sheet;
