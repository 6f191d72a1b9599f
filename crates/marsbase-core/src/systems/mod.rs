//! Systems - logic that operates on components

mod behavior;
mod crew;
mod metrics;
mod mission;
mod robots;
mod status;
mod structures;

pub use behavior::*;
pub use crew::*;
pub use metrics::*;
pub use mission::*;
pub use robots::*;
pub use status::*;
pub use structures::*;
