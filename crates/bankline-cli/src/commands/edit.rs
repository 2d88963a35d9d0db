//! Track editor: opens the editor window on a track file.

use anyhow::Result;
use bankline_viewer::EditorConfig;
use std::path::PathBuf;

pub struct EditArgs {
    pub track: Option<PathBuf>,
    pub config: EditorConfig,
}

pub fn run(args: EditArgs) -> Result<()> {
    match &args.track {
        Some(path) => log::info!("Editing {}", path.display()),
        None => log::info!("Editing an unsaved track"),
    }
    bankline_viewer::app::run(args.config, args.track)
}
