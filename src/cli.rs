#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use clap::Parser;
use eyre::{Context, Result};

use crate::config::{self, Configuration, load_configuration, lookup_config_path};

#[derive(Debug, Parser)]
#[command(
    version,
    about,
    long_about = r#"Stores closed support ticket transcripts posted by the bot and serves
them as HTML pages under /<transcript_id>, with an admin listing under /admin.

Without --config the configuration file is looked up in the following order,
falling back to built-in defaults (in-memory database, 0.0.0.0:3000):
    * $XDG_CONFIG_HOME/transcripts/config.toml
    * $HOME/.config/transcripts/config.toml
    * $HOME/.transcripts.toml
"#,
    disable_version_flag = true
)]
pub struct Command {
    /// Configuration file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Listen address, overrides `server.bind`
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// Show the version
    #[arg(short, long)]
    version: bool,
}

impl Command {
    pub fn new() -> Command {
        Self::parse()
    }

    /// Loads the configuration file, or the defaults when none is found, and
    /// applies command line overrides.
    pub fn get_config(&self) -> Result<Configuration> {
        let config_path = self
            .config
            .clone()
            .unwrap_or_else(|| lookup_config_path().unwrap_or_default());

        let mut config = if config_path.is_empty() {
            Configuration::default().resolve()?
        } else {
            load_configuration(&config_path).wrap_err("loading configuration")?
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        Ok(config)
    }

    pub fn version(&self) -> bool {
        self.version
    }

    pub fn print_version(&self) {
        println!("{}", config::version())
    }
}
