//! Print the configuration the editor would start with.

use anyhow::{Context, Result};
use bankline_viewer::EditorConfig;

pub fn run(config: &EditorConfig) -> Result<()> {
    let text = config
        .to_toml_string()
        .context("Failed to render editor config")?;
    print!("{}", text);
    Ok(())
}
