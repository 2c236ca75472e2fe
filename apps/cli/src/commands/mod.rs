//! 命令定义和实现

pub mod config;
pub mod plan;
pub mod run;

pub use config::ConfigCommand;
pub use plan::PlanCommand;
pub use run::RunCommand;

use anyhow::{Context, Result};
use flashlight_cell::CellConfig;
use std::path::Path;

/// 加载工位配置（`--config` 优先，其次默认路径，否则内置默认值）
pub fn load_config(path: Option<&Path>) -> Result<CellConfig> {
    CellConfig::load_or_default(path).context("加载工位配置失败")
}
