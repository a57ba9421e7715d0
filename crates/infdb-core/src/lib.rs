pub mod app_config;
pub mod config;
pub mod filter;
pub mod identifiers;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StoreTarget};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{
    compile_filter, BoundParam, CompiledFilter, Conjunction, FilterAttribute, FilterCondition,
    FilterError, FilterMode, FilterOperator, FilterValue,
};
pub use identifiers::{quote_ident, resolve_projection, IdentifierError, Projection};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
