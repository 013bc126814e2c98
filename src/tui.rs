use anyhow::Result;

use crate::settings::SettingsPaths;

#[derive(Clone, Debug)]
pub struct TuiRunOptions {
    pub paths: SettingsPaths,
}

pub fn run(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
