//! Terminal-facing parts: prompts, the conversion table and setup.

pub mod monitor;
pub mod session;
pub mod setup;
pub mod ui;

pub use session::Session;
