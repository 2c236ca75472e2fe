//! 工位层错误类型定义

use crate::assembly::AssemblyStep;
use flashlight_driver::RobotError;
use std::path::PathBuf;
use thiserror::Error;

/// 工位层错误类型
#[derive(Error, Debug)]
pub enum CellError {
    /// 托盘槽位未配置
    #[error("Unknown tray slot: {0}")]
    UnknownTraySlot(u8),

    /// 配置校验失败
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 配置文件读写失败
    #[error("Config file error ({}): {source}", path.display())]
    ConfigIo {
        /// 文件路径
        path: PathBuf,
        /// 底层 I/O 错误
        #[source]
        source: std::io::Error,
    },

    /// 配置解析失败
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 配置序列化失败
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// 机器人后端错误
    #[error(transparent)]
    Robot(#[from] RobotError),

    /// 装配步骤失败（序列在此处停止）
    #[error("Assembly step `{step}` failed: {source}")]
    StepFailed {
        /// 失败的步骤
        step: AssemblyStep,
        /// 原始错误
        #[source]
        source: Box<CellError>,
    },
}

impl CellError {
    /// 去掉步骤包装，返回最内层错误
    pub fn root_cause(&self) -> &CellError {
        match self {
            CellError::StepFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// 失败的装配步骤（如果有）
    pub fn failed_step(&self) -> Option<AssemblyStep> {
        match self {
            CellError::StepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}
