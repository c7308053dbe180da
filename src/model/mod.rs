pub mod config;
pub mod item;
pub mod library;
pub mod workspace;

pub use config::*;
pub use item::*;
pub use library::*;
pub use workspace::*;
