use crate::infrastructure::error::{CliError, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub default_level: tracing::Level,
    pub show_targets: bool,
    pub show_thread_ids: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: tracing::Level::INFO,
            show_targets: true,
            show_thread_ids: false,
        }
    }
}

impl LogConfig {
    /// Development configuration (verbose, human-readable)
    pub fn dev() -> Self {
        Self {
            default_level: tracing::Level::DEBUG,
            show_thread_ids: true,
            ..Default::default()
        }
    }

    /// Interactive shell: only warnings, so output stays readable
    pub fn quiet() -> Self {
        Self {
            default_level: tracing::Level::WARN,
            show_targets: false,
            ..Default::default()
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_filter(&self) -> Result<EnvFilter> {
        let level = self.default_level;
        let mut filter = EnvFilter::new(format!(
            "{}={}",
            env!("CARGO_PKG_NAME").replace('-', "_"),
            level
        ));

        for directive in [
            format!("lobby_session_core={}", level),
            format!("lobby_session_client={}", level),
            "tungstenite=warn".to_string(),
        ] {
            let directive = directive
                .parse()
                .map_err(|e| CliError::Logging(format!("bad directive {}: {}", directive, e)))?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    pub fn init(self) -> Result<()> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => self.default_filter()?,
        };

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.show_targets)
            .with_thread_ids(self.show_thread_ids);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| CliError::Logging(e.to_string()))
    }
}
