pub use controller::*;
pub use events::*;
pub use snapshot::*;
pub use state::*;

mod controller;
mod events;
mod snapshot;
mod state;
