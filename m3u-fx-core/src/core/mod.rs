pub use errors::*;

pub mod config;
pub mod loader;
pub mod playback;
pub mod players;
pub mod playlist;

mod errors;
