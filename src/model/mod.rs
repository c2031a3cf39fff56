pub mod config;
pub mod memo;
pub mod todo;

pub use config::*;
pub use memo::*;
pub use todo::*;
