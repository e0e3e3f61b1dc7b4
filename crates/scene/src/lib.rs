pub mod export;
pub mod map;
pub mod network;
pub mod presentation;
pub mod selection;

pub use export::{NetworkSnapshot, export_file_name, render_svg, safe_file_name};
pub use map::{InMemoryMap, MapFacade, fit_to_points, reset_view, sync_layers};
pub use network::*;
pub use presentation::{run_presentation_step, start_presentation};
pub use selection::DestinationSelection;
