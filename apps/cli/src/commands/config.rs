//! 配置管理命令
//!
//! 查看、初始化工位配置文件

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use flashlight_cell::CellConfig;
use std::fs;
use std::path::{Path, PathBuf};

use super::load_config;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印当前生效的配置（TOML）
    Show,

    /// 打印默认配置文件路径
    Path,

    /// 写入默认配置
    Init {
        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(config_path),
            ConfigCommand::Path => Self::path_(),
            ConfigCommand::Init { force } => Self::init_(config_path, force),
        }
    }

    fn show_(config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path)?;
        print!("{}", config.to_toml_string()?);
        Ok(())
    }

    fn path_() -> Result<()> {
        println!("{}", default_path()?.display());
        Ok(())
    }

    fn init_(config_path: Option<&Path>, force: bool) -> Result<()> {
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_path()?,
        };

        if path.exists() && !force {
            bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
        }
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("创建配置目录失败")?;
        }

        CellConfig::default().save(&path)?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }
}

fn default_path() -> Result<PathBuf> {
    CellConfig::default_path().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))
}
