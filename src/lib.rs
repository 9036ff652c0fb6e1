pub mod args;
pub mod commands;
mod config;
mod error;
pub mod form;
pub mod kv;
pub mod model;
pub mod store;
pub mod tui;
mod utils;
pub mod view;


pub use config::Config;
pub use error::Error;
pub use error::Result;
