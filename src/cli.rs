//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (resolve, serve, health), and their associated argument
//! structs. Server flags have environment variable equivalents for
//! container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "actual-url",
    version,
    about = "Reconstruct the URL a client requested from behind reverse proxies",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        actual-url resolve request.json            Resolve a saved request\n  \
        actual-url resolve -H host:a.com --url /x  Resolve an ad-hoc request\n  \
        actual-url serve -p 8080                   Echo the resolved URL of every request"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the URL of a described request
    Resolve(ResolveArgs),

    /// Start an echo server that answers with each request's resolved URL
    Serve(ServeArgs),

    /// Check health of a running echo server
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        actual-url resolve requests/behind-nginx.json\n  \
        cat req.json | actual-url resolve -\n  \
        actual-url resolve --url /a?b=c -H host:example.com -H x-forwarded-proto:https\n  \
        actual-url resolve -H host:example.com --encrypted --local-port 8443")]
pub struct ResolveArgs {
    /// JSON request description (`-` for stdin)
    pub input: Option<PathBuf>,

    /// Request target (overrides the description's `url`)
    #[arg(long)]
    pub url: Option<String>,

    /// Extra header as NAME:VALUE, checked before the description's headers
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Mark the connection as TLS-terminated locally
    #[arg(long)]
    pub encrypted: bool,

    /// Local port the connection arrived on
    #[arg(long)]
    pub local_port: Option<u16>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Log level (resolution steps are logged at trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        actual-url serve                          Listen on 0.0.0.0:3000\n  \
        actual-url serve -p 8080 --pretty         Local dev mode\n  \
        actual-url serve --assume-encrypted       Behind a TLS passthrough")]
pub struct ServeArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Treat every connection as TLS-terminated when no header says otherwise
    #[arg(long, env = "ASSUME_ENCRYPTED")]
    pub assume_encrypted: bool,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_headers() {
        let cli = Cli::try_parse_from([
            "actual-url",
            "resolve",
            "-H",
            "host:a.com",
            "--header",
            "x-forwarded-proto:https",
            "--local-port",
            "8080",
        ])
        .unwrap();

        let Some(Commands::Resolve(args)) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.headers, ["host:a.com", "x-forwarded-proto:https"]);
        assert_eq!(args.local_port, Some(8080));
        assert!(args.input.is_none());
    }
}
