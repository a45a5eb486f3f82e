pub mod archive;
pub mod config;
pub mod error;
pub mod fittest;
pub mod item;
pub mod metric;
pub mod organism;
pub mod ranking;
pub mod shared;

pub use archive::*;
pub use config::*;
pub use error::{ConfigError, NoveltyError};
pub use fittest::*;
pub use item::*;
pub use metric::*;
pub use organism::*;
pub use ranking::*;
pub use shared::*;
