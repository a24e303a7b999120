pub use entry::*;
pub use parser::*;
pub use state::*;

mod entry;
mod parser;
mod state;
