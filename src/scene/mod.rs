//! Scene inputs - the data the window or CLI hands to the renderer
//!
//! - Control points of the 4x4 Bezier patch
//! - Render parameters (camera, layer toggles, highlight)
//! - RON load/save for both

mod error;
mod io;
mod params;
mod patch;

pub use error::*;
pub use io::*;
pub use params::*;
pub use patch::*;
