// Vaultchat - note-vault chat assistant
// Library exports

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod history;
pub mod provider;
pub mod session;

pub use error::{Error, Result};
