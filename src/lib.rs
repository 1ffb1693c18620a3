pub mod ops;

mod app;
pub mod audit;
pub mod backup;
pub mod commands;
pub mod config;
pub mod gate;
pub mod inspect;
pub mod outcome;
mod ui;

#[cfg(test)]
mod testing;

// Re-export App and Config from modules
pub use app::App;
pub use config::Config;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
