//! Shared CLI and configuration definitions for forte-client.
//!
//! These types are used by the `build.rs` script (for man page generation)
//! and by the runtime binary. Keeping them in their own crate lets the build
//! script depend on them without pulling in the networking code.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Default runtime host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Standard IEC 61499 management port.
pub const DEFAULT_PORT: u16 = 61_499;
/// Default connect, read and write timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "FORTE_";
/// Configuration file read from the working directory.
pub const DOTFILE: &str = ".forte.toml";
/// Resource used by the demo deployment.
pub const DEFAULT_DEMO_RESOURCE: &str = "TEST_APP";
/// Delay between demo steps in milliseconds.
pub const DEFAULT_PACE_MS: u64 = 1_000;

/// Resolved runtime configuration.
///
/// Values are layered lowest to highest: built-in defaults, the
/// [`DOTFILE`] in the working directory, `FORTE_*` environment variables,
/// then command-line flags.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Runtime host name or address.
    pub host: String,
    /// Runtime management port.
    pub port: u16,
    /// Connect, read and write timeout in milliseconds.
    pub timeout_ms: u64,
    /// Escape XML metacharacters in attribute values.
    pub escape_attributes: bool,
    /// Largest accepted response payload in bytes; `0` disables the limit.
    pub max_response_bytes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            escape_attributes: false,
            max_response_bytes: 0,
        }
    }
}

impl AppConfig {
    /// Assemble the layered configuration sources.
    #[must_use]
    pub fn figment(overrides: &ConfigOverrides) -> Figment {
        with_dotfile(Figment::from(Serialized::defaults(Self::default())))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
    }

    /// Load configuration from every source.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or a value has the wrong
    /// type.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, Box<figment::Error>> {
        Self::figment(overrides).extract().map_err(Box::new)
    }
}

#[cfg(feature = "toml")]
fn with_dotfile(layers: Figment) -> Figment {
    use figment::providers::{Format, Toml};
    layers.merge(Toml::file(DOTFILE))
}

#[cfg(not(feature = "toml"))]
const fn with_dotfile(layers: Figment) -> Figment { layers }

#[expect(
    clippy::trivially_copy_pass_by_ref,
    reason = "serde skip_serializing_if passes a reference"
)]
const fn is_false(value: &bool) -> bool { !*value }

/// Command-line overrides for [`AppConfig`].
///
/// Only flags that were actually given are serialised, so unset flags leave
/// lower layers untouched.
#[derive(Args, Serialize, Default, Debug, Clone)]
pub struct ConfigOverrides {
    /// Runtime host name or address.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Runtime management port.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Connect, read and write timeout in milliseconds.
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Escape XML metacharacters in attribute values.
    #[arg(long)]
    #[serde(skip_serializing_if = "is_false")]
    pub escape_attributes: bool,
    /// Largest accepted response payload in bytes (0 = unlimited).
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_response_bytes: Option<u32>,
}

/// Arguments for `send`.
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    /// Logical action, e.g. `CREATE_FB`. Unknown names are sent verbatim.
    pub action: String,
    /// Parameters as `key=value` pairs.
    pub params: Vec<String>,
}

/// Arguments for `load`.
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Load script with one request document per line.
    pub file: Utf8PathBuf,
    /// Classify and list the steps without connecting.
    #[arg(long)]
    pub dry_run: bool,
    /// Print step outcomes as JSON lines.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `demo`.
#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    /// Resource that hosts the demo program.
    #[arg(long, default_value = DEFAULT_DEMO_RESOURCE)]
    pub resource: String,
    /// Delay between steps in milliseconds.
    #[arg(long, default_value_t = DEFAULT_PACE_MS)]
    pub pace_ms: u64,
}

/// Arguments for `write-examples`.
#[derive(Args, Debug, Clone)]
pub struct WriteExamplesArgs {
    /// Target directory.
    #[arg(default_value = ".")]
    pub dir: Utf8PathBuf,
}

/// Subcommands exposed by `forte-client`.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List function blocks on the runtime.
    Query,
    /// Send a single command.
    Send(SendArgs),
    /// Run a load script.
    Load(LoadArgs),
    /// Deploy the timer and counter demo program.
    Demo(DemoArgs),
    /// Write the sample load scripts.
    #[command(name = "write-examples")]
    WriteExamples(WriteExamplesArgs),
}

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "forte-client",
    version,
    about = "Deploy and control IEC 61499 applications on a FORTE runtime"
)]
pub struct Cli {
    /// Configuration overrides (merged over files and environment).
    #[command(flatten)]
    pub config: ConfigOverrides,
    /// Subcommand; the demo runs when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}
