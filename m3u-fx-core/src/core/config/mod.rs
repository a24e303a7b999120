pub use settings::*;

mod settings;
