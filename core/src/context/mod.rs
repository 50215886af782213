mod config;
mod interner;

pub use config::load_config;
pub use interner::{IStr, intern, resolve};
