//! # Flashlight Cell
//!
//! 手电筒装配工位：六轴机械臂从托盘取出端盖、电池、灯头和底座，
//! 借助夹爪和夹具完成装配，并把成品放回托盘。
//!
//! 本 crate 只负责动作编排：
//!
//! - [`config`] - 只读的工位配置（坐标、高度、关节目标、速度）
//! - [`choreography`] - 取料、放料、拧紧等动作段
//! - [`assembly`] - 固定顺序的装配主流程
//!
//! 运动规划与伺服控制由控制运行时负责，通过 [`flashlight_driver::Robot`] 访问。
//!
//! # 示例
//!
//! ```rust
//! use flashlight_cell::{CellConfig, run_assembly};
//! use flashlight_driver::RecordingRobot;
//!
//! let config = CellConfig::default();
//! let mut robot = RecordingRobot::new(config.robot.name.clone());
//! let report = run_assembly(&mut robot, &config).unwrap();
//! assert_eq!(report.commands_issued, robot.commands().len());
//! ```

pub mod assembly;
pub mod choreography;
pub mod config;
pub mod error;

pub use assembly::{AssemblyReport, AssemblyStep, plan, run_assembly};
pub use config::CellConfig;
pub use error::CellError;
