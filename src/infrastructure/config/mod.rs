//! Config store adapters

mod xdg;

pub use xdg::{XdgConfigStore, CONFIG_FILE};
