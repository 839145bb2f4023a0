// ABOUTME: Library root for context-fork: re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod capture;
pub mod cli;
pub mod config;
pub mod prompt;
pub mod session;
