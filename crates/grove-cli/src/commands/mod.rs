pub mod build;
pub mod header;
pub mod list;
pub mod logging;
pub mod options_loader;
pub mod plan;
pub mod report;

#[cfg(test)]
mod build_tests;
