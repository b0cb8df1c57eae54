//! Planar geometry for region boundaries.
//!
//! Rings, polygons, and the anchor locator that places one representative
//! marker point per region.

pub mod anchor;
pub mod region;
pub mod ring;

pub use anchor::{locate, Anchor};
pub use region::{Polygon, Region, RegionGeometry};
pub use ring::Ring;
