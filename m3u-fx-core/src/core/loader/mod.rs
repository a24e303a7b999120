pub use playlist_loader::*;
pub use source::*;

mod playlist_loader;
mod source;
