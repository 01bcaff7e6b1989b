//! Configuration loading for the tollgate gateway.
//!
//! Config files may be TOML, YAML or JSON and support `${ENV}` placeholders.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        config_dir, discover_and_load, find_or_default_config_path, load_config,
        set_config_dir, write_config,
    },
    schema::{
        AuthConfig, NewUserPayload, RealtimeConfig, ServerConfig, SessionConfig, TokenPolicy,
        TollgateConfig, UserEntry,
    },
};
