//! gila: hierarchical configuration store.
//!
//! Values come from five sources, highest precedence first: overrides,
//! automatic environment lookup, bound environment variables, a config file,
//! and defaults. Keys are case-insensitive dotted paths (`server.http.port`)
//! and may be reached through aliases.
//!
//! ```no_run
//! use gila::ConfigStore;
//!
//! let mut config = ConfigStore::new();
//! config.set_default("server.port", 8080);
//! config.add_config_path("/etc/myapp");
//! config.set_env_prefix("myapp");
//! config.enable_automatic_env();
//! config.read_config_file()?;
//!
//! let port = config.get_u64("server.port");
//! # Ok::<(), gila::Error>(())
//! ```

pub mod cli;
pub mod env;
pub mod error;
pub mod global;
pub mod logging;
pub mod resolve;
pub mod source;
pub mod store;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{Error, ErrorCode, Result};
pub use serde_json::{Map, Value};
pub use source::ConfigFormat;
pub use store::{ConfigStore, ConfigTier, Resolved};
