use anyhow::{Context, Result};

use crate::config::ExtractConfig;
use crate::output::print_success;

pub fn show(cfg: &ExtractConfig) -> Result<()> {
    let text = toml::to_string_pretty(cfg).context("Serializing configuration")?;
    print!("{text}");
    Ok(())
}

pub fn check(cfg: &ExtractConfig) -> Result<()> {
    print_success(&format!(
        "Configuration is valid (input: {}, output: {} as {})",
        cfg.input.dir.display(),
        cfg.output.dir.display(),
        cfg.output.format
    ));
    Ok(())
}
