pub mod geo;
pub mod geodesy;
pub mod vec;

pub use geo::*;
pub use geodesy::*;
pub use vec::*;
