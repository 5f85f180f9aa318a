pub mod config;
pub mod consolidation;
pub mod data;

#[cfg(test)]
mod data_tests;
