use {
    anyhow::Result,
    clap::Subcommand,
    secrecy::Secret,
    tollgate_config::{TollgateConfig, discover_and_load, find_or_default_config_path, write_config},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML (secrets redacted).
    Show,
    /// Print the path of the config file in use.
    Path,
    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => show(),
        ConfigAction::Path => {
            println!("{}", find_or_default_config_path().display());
            Ok(())
        },
        ConfigAction::Init { force } => {
            let path = write_config(&TollgateConfig::default(), force)?;
            println!("Wrote {}", path.display());
            Ok(())
        },
    }
}

fn show() -> Result<()> {
    let mut config = discover_and_load();
    if config.session.secret_key.is_some() {
        config.session.secret_key = Some(Secret::new("<redacted>".to_string()));
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
