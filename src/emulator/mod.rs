pub mod config;
pub mod selftest;
pub mod shell;
