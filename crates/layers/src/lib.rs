pub mod connector;
pub mod labels;
pub mod layer;
pub mod symbology;

pub use connector::*;
pub use labels::*;
pub use layer::*;
