//! plan 命令
//!
//! 输出装配命令序列，不连接机器人

use anyhow::{Context, Result};
use clap::Args;
use flashlight_cell::plan;
use std::path::Path;

use super::load_config;

/// 命令序列输出参数
#[derive(Args, Debug)]
pub struct PlanCommand {
    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

impl PlanCommand {
    pub fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let config = load_config(config_path)?;
        let commands = plan(&config).context("生成命令序列失败")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&commands)?);
            return Ok(());
        }

        println!("📋 {} 装配命令序列 ({} 条):", config.robot.name, commands.len());
        let width = commands.len().to_string().len();
        for (idx, command) in commands.iter().enumerate() {
            println!("  {:>width$}. {}", idx + 1, command, width = width);
        }
        Ok(())
    }
}
