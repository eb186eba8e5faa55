pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod fetcher;
pub mod output;
pub mod utils;
