// Frameworks layer: runtime bootstrap, environment knobs and the rules file.

pub mod config;
pub mod rules;
pub mod server;
