pub mod catalog;
pub mod config;
pub mod connection;
pub mod datasets;
mod error;
pub mod loader;
pub mod logger;
pub mod pipeline;
mod tuple;
pub mod verify;

pub use error::LoaderError;
pub use tuple::{Field, Tuple};

pub mod prelude {
    pub use super::{Field, LoaderError, Tuple};
    pub use crate::catalog::prelude::*;
    pub use crate::config::{ConnectionConfig, DatasetChoice, LoaderOpt, Prompter, TerminalPrompter};
    pub use crate::connection::{with_connection, SqlConnection, SqliteConnection};
    pub use crate::datasets::Dataset;
    pub use crate::loader::prelude::*;
    #[cfg(feature = "dataframe")]
    pub use crate::pipeline::run_frame;
    pub use crate::pipeline::{recreate_schema, run_cursor};
    pub use crate::verify::Verification;
}
