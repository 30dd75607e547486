//! Settings resolved from config files, then `SCRIPTORIUM__*` environment
//! variables, then command-line flags. Later layers win.

use std::{fmt, net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::{
    Config, ConfigError, Environment, File,
    builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

type Builder = ConfigBuilder<DefaultState>;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "scriptorium";
const ENV_PREFIX: &str = "SCRIPTORIUM";

#[derive(Debug, Parser)]
#[command(name = "scriptorium", version, about = "Scriptorium blog server")]
pub struct CliArgs {
    /// Extra configuration file, layered above the default ones.
    #[arg(long = "config-file", env = "SCRIPTORIUM_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP server (default).
    Serve(Box<ServeArgs>),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[arg(long = "server-host", value_name = "HOST")]
    pub host: Option<String>,

    #[arg(long = "server-port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Seconds to wait for open connections after a shutdown signal.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub graceful_shutdown_seconds: Option<u64>,

    /// trace|debug|info|warn|error
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Token the admin API expects as a bearer credential.
    #[arg(long = "admin-token", value_name = "TOKEN")]
    pub admin_token: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseArgs {
    #[arg(long = "database-url", value_name = "URL")]
    pub url: Option<String>,

    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub max_connections: Option<u32>,
}

impl CliArgs {
    /// Push the chosen subcommand's flags on top of `builder`.
    fn layer(&self, builder: Builder) -> Result<Builder, ConfigError> {
        match self.command.as_ref() {
            Some(Command::Serve(args)) => args.layer(builder),
            Some(Command::Migrate(args)) => args.database.layer(builder),
            None => Ok(builder),
        }
    }
}

impl ServeArgs {
    fn layer(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let builder = builder
            .set_override_option("server.host", self.host.clone())?
            .set_override_option("server.port", self.port)?
            .set_override_option(
                "server.graceful_shutdown_seconds",
                self.graceful_shutdown_seconds,
            )?
            .set_override_option("logging.level", self.log_level.clone())?
            .set_override_option("logging.json", self.log_json)?
            .set_override_option("admin.token", self.admin_token.clone())?;
        self.database.layer(builder)
    }
}

impl DatabaseArgs {
    fn layer(&self, builder: Builder) -> Result<Builder, ConfigError> {
        builder
            .set_override_option("database.url", self.url.clone())?
            .set_override_option("database.max_connections", self.max_connections)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub admin: AdminSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// `None` runs the server on the in-memory store.
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

#[derive(Clone, Default)]
pub struct AdminSettings {
    pub token: Option<String>,
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSettings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

fn invalid(key: &'static str, reason: impl Into<String>) -> LoadError {
    LoadError::Invalid {
        key,
        reason: reason.into(),
    }
}

/// Parse the process arguments and resolve settings from them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = with_defaults(Config::builder())?
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_deref() {
        builder = builder.add_source(File::from(path).required(true));
    }

    let builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));
    resolve(cli.layer(builder)?)
}

fn with_defaults(builder: Builder) -> Result<Builder, ConfigError> {
    builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000u16)?
        .set_default("server.graceful_shutdown_seconds", 30u64)?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("database.max_connections", 8u32)
}

fn resolve(builder: Builder) -> Result<Settings, LoadError> {
    let raw: RawSettings = builder.build()?.try_deserialize()?;

    Ok(Settings {
        server: raw.server.try_into()?,
        logging: raw.logging.try_into()?,
        database: raw.database.try_into()?,
        admin: AdminSettings {
            token: non_blank(raw.admin.token),
        },
    })
}

#[derive(Deserialize)]
struct RawSettings {
    server: RawServer,
    logging: RawLogging,
    database: RawDatabase,
    #[serde(default)]
    admin: RawAdmin,
}

#[derive(Deserialize)]
struct RawServer {
    host: String,
    port: u16,
    graceful_shutdown_seconds: u64,
}

#[derive(Deserialize)]
struct RawLogging {
    level: String,
    json: bool,
}

#[derive(Deserialize)]
struct RawDatabase {
    url: Option<String>,
    max_connections: u32,
}

#[derive(Deserialize, Default)]
struct RawAdmin {
    token: Option<String>,
}

impl TryFrom<RawServer> for ServerSettings {
    type Error = LoadError;

    fn try_from(raw: RawServer) -> Result<Self, Self::Error> {
        if raw.port == 0 {
            return Err(invalid("server.port", "port must be greater than zero"));
        }
        let addr = format!("{}:{}", raw.host.trim(), raw.port)
            .parse::<SocketAddr>()
            .map_err(|err| invalid("server.host", format!("`{}`: {err}", raw.host)))?;

        if raw.graceful_shutdown_seconds == 0 {
            return Err(invalid(
                "server.graceful_shutdown_seconds",
                "must be greater than zero",
            ));
        }

        Ok(Self {
            addr,
            graceful_shutdown: Duration::from_secs(raw.graceful_shutdown_seconds),
        })
    }
}

impl TryFrom<RawLogging> for LoggingSettings {
    type Error = LoadError;

    fn try_from(raw: RawLogging) -> Result<Self, Self::Error> {
        let level = LevelFilter::from_str(raw.level.trim())
            .map_err(|err| invalid("logging.level", format!("`{}`: {err}", raw.level)))?;
        let format = if raw.json {
            LogFormat::Json
        } else {
            LogFormat::Compact
        };
        Ok(Self { level, format })
    }
}

impl TryFrom<RawDatabase> for DatabaseSettings {
    type Error = LoadError;

    fn try_from(raw: RawDatabase) -> Result<Self, Self::Error> {
        let max_connections = NonZeroU32::new(raw.max_connections)
            .ok_or_else(|| invalid("database.max_connections", "must be greater than zero"))?;
        Ok(Self {
            url: non_blank(raw.url),
            max_connections,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn resolve_from(toml: &str, argv: &[&str]) -> Result<Settings, LoadError> {
        let cli = CliArgs::parse_from(argv);
        let builder =
            with_defaults(Config::builder())?.add_source(File::from_str(toml, FileFormat::Toml));
        resolve(cli.layer(builder)?)
    }

    fn invalid_key(result: Result<Settings, LoadError>) -> Option<&'static str> {
        match result {
            Err(LoadError::Invalid { key, .. }) => Some(key),
            _ => None,
        }
    }

    #[test]
    fn empty_sources_fall_back_to_defaults() {
        let settings = resolve_from("", &["scriptorium"]).expect("valid settings");

        assert_eq!(settings.server.addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert!(settings.database.url.is_none());
        assert_eq!(settings.database.max_connections.get(), 8);
        assert!(settings.admin.token.is_none());
    }

    #[test]
    fn flags_win_over_file_values() {
        let file = r#"
            [server]
            port = 4000
            [logging]
            level = "warn"
            [admin]
            token = "from-file"
        "#;

        let from_file = resolve_from(file, &["scriptorium"]).expect("valid settings");
        assert_eq!(from_file.server.addr.port(), 4000);
        assert_eq!(from_file.logging.level, LevelFilter::WARN);
        assert_eq!(from_file.admin.token.as_deref(), Some("from-file"));

        let settings = resolve_from(
            file,
            &[
                "scriptorium",
                "serve",
                "--server-port",
                "4321",
                "--log-level",
                "debug",
                "--log-json",
                "yes",
                "--admin-token",
                "from-cli",
            ],
        )
        .expect("valid settings");

        assert_eq!(settings.server.addr.port(), 4321);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.admin.token.as_deref(), Some("from-cli"));
    }

    #[test]
    fn migrate_only_takes_database_flags() {
        let settings = resolve_from(
            "[database]\nurl = \"postgres://file\"",
            &[
                "scriptorium",
                "migrate",
                "--database-url",
                "postgres://cli",
                "--database-max-connections",
                "2",
            ],
        )
        .expect("valid settings");

        assert_eq!(settings.database.url.as_deref(), Some("postgres://cli"));
        assert_eq!(settings.database.max_connections.get(), 2);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let settings = resolve_from(
            "[database]\nurl = \"   \"\n[admin]\ntoken = \"\"",
            &["scriptorium"],
        )
        .expect("valid settings");

        assert!(settings.database.url.is_none());
        assert!(settings.admin.token.is_none());
    }

    #[test]
    fn out_of_range_values_name_their_key() {
        assert_eq!(
            invalid_key(resolve_from("[server]\nport = 0", &["scriptorium"])),
            Some("server.port")
        );
        assert_eq!(
            invalid_key(resolve_from("[server]\nhost = \"not a host\"", &["scriptorium"])),
            Some("server.host")
        );
        assert_eq!(
            invalid_key(resolve_from(
                "[server]\ngraceful_shutdown_seconds = 0",
                &["scriptorium"]
            )),
            Some("server.graceful_shutdown_seconds")
        );
        assert_eq!(
            invalid_key(resolve_from(
                "[database]\nmax_connections = 0",
                &["scriptorium"]
            )),
            Some("database.max_connections")
        );
        assert_eq!(
            invalid_key(resolve_from("[logging]\nlevel = \"chatty\"", &["scriptorium"])),
            Some("logging.level")
        );
    }

    #[test]
    fn admin_token_is_redacted_in_debug_output() {
        let settings = AdminSettings {
            token: Some("s3cret".to_string()),
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn bare_invocation_has_no_subcommand() {
        let args = CliArgs::parse_from(["scriptorium"]);
        assert!(args.command.is_none());
        assert!(args.config_file.is_none());
    }

    #[test]
    fn serve_flags_parse_into_args() {
        let args = CliArgs::parse_from([
            "scriptorium",
            "serve",
            "--server-host",
            "0.0.0.0",
            "--server-port",
            "8080",
            "--database-url",
            "postgres://override",
            "--log-json",
            "true",
        ]);

        let Some(Command::Serve(serve)) = args.command else {
            panic!("expected serve command");
        };
        assert_eq!(serve.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(serve.port, Some(8080));
        assert_eq!(serve.database.url.as_deref(), Some("postgres://override"));
        assert_eq!(serve.log_json, Some(true));
    }
}
