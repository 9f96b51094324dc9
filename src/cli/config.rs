//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.default_radius_miles")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    // The file as written, without environment overrides
    let mut config = Config::load_from(&Config::config_path()?)?;

    match (&args.key, &args.value) {
        (None, None) => print!("{}", render_config(&config)),

        (Some(key), None) => match config.get(key) {
            Some(value) => println!("{}", value),
            None => {
                return Err(Error::Config(format!(
                    "Unknown config key: {}\n\nAvailable keys:\n  {}",
                    key,
                    Config::available_keys().join("\n  ")
                )));
            }
        },

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// All configuration values grouped by section, API keys masked
fn render_config(config: &Config) -> String {
    let mut output = String::new();
    let mut section = "";

    for key in Config::available_keys() {
        let Some((prefix, name)) = key.split_once('.') else {
            continue;
        };
        if prefix != section {
            if !section.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[{}]\n", prefix));
            section = prefix;
        }

        let value = config.get(key).unwrap_or_default();
        let line = if prefix == "api_keys" {
            if value.is_empty() {
                format!("{} = \"\" # not configured\n", name)
            } else {
                format!("{} = \"***\" # configured\n", name)
            }
        } else if value.parse::<f64>().is_ok() {
            format!("{} = {}\n", name, value)
        } else {
            format!("{} = \"{}\"\n", name, value)
        };
        output.push_str(&line);
    }

    output
}
