pub mod config;
pub mod play;
pub mod script;
pub mod simulate;
