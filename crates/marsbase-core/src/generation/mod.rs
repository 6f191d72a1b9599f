//! Generation - facility construction, agent placement and population

mod blueprint;
mod placement;
mod population;

pub use blueprint::*;
pub use placement::*;
pub use population::*;
