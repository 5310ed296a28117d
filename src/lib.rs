pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod ident;
pub mod logging;
pub mod pipeline;
pub mod reconcile;
pub mod schema;
pub mod verify;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::BuildConfig;
pub use error::{Error, Result};
pub use pipeline::{build_dataset, build_from_documents, BuildSummary, Phase};
