//! Interactive console front end

mod app;
pub mod command;

pub use app::App;
pub use command::{Command, ParseError};
