//! Configuration inspection commands.

use quickhub_config::{Settings, config_path, example_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let settings = Settings::load().map_err(|e| CliError::Config {
                message: e.to_string(),
            })?;
            let rendered = format!(
                "protocol: {}\nhost:     {}\nuser:     {}\npassword: ********",
                settings.protocol, settings.host, settings.user
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config_path();
            if path.exists() && !force {
                return Err(CliError::Validation {
                    field: "config".into(),
                    reason: format!("{} already exists (use --force to overwrite)", path.display()),
                });
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, example_config())?;
            output::print_output(&format!("wrote {}", path.display()), global.quiet);
            Ok(())
        }
    }
}
