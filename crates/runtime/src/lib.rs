pub mod event_bus;
pub mod presentation;

pub use event_bus::*;
pub use presentation::*;
