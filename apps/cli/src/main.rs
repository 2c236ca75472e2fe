//! # Flashlight CLI
//!
//! 手电筒装配工位命令行工具。
//!
//! ```bash
//! # 演练完整装配流程（记录型后端，检查可达性）
//! flashlight-cli run
//!
//! # 生成 URScript 程序
//! flashlight-cli run --backend urscript --output flashlight.script
//!
//! # 查看命令序列
//! flashlight-cli plan --json
//!
//! # 配置管理
//! flashlight-cli config init
//! flashlight-cli config show
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{ConfigCommand, PlanCommand, RunCommand};

/// Flashlight CLI - 装配工位命令行工具
#[derive(Parser, Debug)]
#[command(name = "flashlight-cli")]
#[command(about = "Command-line interface for the flashlight assembly cell", long_about = None)]
#[command(version)]
struct Cli {
    /// 工位配置文件（默认使用配置目录下的 flashlight/cell.toml）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 执行装配流程
    Run {
        #[command(flatten)]
        args: RunCommand,
    },

    /// 输出装配命令序列（不执行）
    Plan {
        #[command(flatten)]
        args: PlanCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 日志写到 stderr，stdout 留给程序输出
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flashlight_cli=info".parse()?)
                .add_directive("flashlight_cell=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run { args } => args.execute(config_path),
        Commands::Plan { args } => args.execute(config_path),
        Commands::Config(cmd) => cmd.execute(config_path),
    }
}
