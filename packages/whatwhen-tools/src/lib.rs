//! Supporting pieces for the `what` command-line tool: configuration, working out the report
//! window from command-line dates, and rendering reports as text.

pub mod config;
mod render;
mod window;

pub use render::*;
pub use window::*;
