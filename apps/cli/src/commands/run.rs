//! run 命令
//!
//! 执行完整装配流程

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use flashlight_cell::{AssemblyReport, run_assembly};
use flashlight_driver::{RecordingRobot, UrScriptProgram};
use std::path::{Path, PathBuf};
use tracing::info;

use super::load_config;

/// 机器人后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// 记录型后端（演练，检查可达性和工具互锁）
    Sim,
    /// 生成 URScript 程序
    Urscript,
}

/// 装配执行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 机器人后端
    #[arg(short, long, value_enum, default_value_t = Backend::Sim)]
    pub backend: Backend,

    /// URScript 输出文件（默认打印到 stdout）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 机器人名（覆盖配置）
    #[arg(short, long)]
    pub robot: Option<String>,
}

impl RunCommand {
    /// 执行装配
    pub fn execute(&self, config_path: Option<&Path>) -> Result<()> {
        let mut config = load_config(config_path)?;
        if let Some(ref robot) = self.robot {
            config.robot.name = robot.clone();
        }
        info!(backend = ?self.backend, robot = %config.robot.name, "Running assembly");

        match self.backend {
            Backend::Sim => {
                println!("🤖 演练装配流程: {}", config.robot.name);
                let mut robot = RecordingRobot::new(config.robot.name.clone());
                let report = run_assembly(&mut robot, &config).context("装配流程失败")?;
                print_report(&report);
            },
            Backend::Urscript => {
                let mut program =
                    UrScriptProgram::new(config.robot.name.clone(), &config.robot.program);
                let report = run_assembly(&mut program, &config).context("生成 URScript 失败")?;

                match self.output {
                    Some(ref path) => {
                        program
                            .save(path)
                            .with_context(|| format!("写入 {} 失败", path.display()))?;
                        println!("✅ URScript 已保存: {}", path.display());
                        print_report(&report);
                    },
                    None => print!("{}", program.render()),
                }
            },
        }

        Ok(())
    }
}

fn print_report(report: &AssemblyReport) {
    println!();
    println!("📊 执行结果:");
    println!("  机器人: {}", report.robot);
    println!("  完成步骤: {}", report.steps_completed.len());
    println!("  命令数: {}", report.commands_issued);
    println!("  耗时: {:.3} 秒", report.elapsed.as_secs_f64());
}
