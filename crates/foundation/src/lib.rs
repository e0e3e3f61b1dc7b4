pub mod bounds;
pub mod hash;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use hash::*;
pub use math::*;
pub use time::*;
