//! # Flashlight Driver
//!
//! 装配工位与机器人控制运行时之间的边界层。
//!
//! - [`RobotCommand`] / [`ToolCommand`]：类型化的运动与工具命令，替代字符串形式的插入代码
//! - [`Robot`]：机器人能力接口，装配动作只依赖这一个 trait
//! - [`RecordingRobot`]：记录命令、模拟夹爪/夹具状态并检查可达性的后端
//! - [`UrScriptProgram`]：把命令流渲染为 URScript 程序的后端
//!
//! 逆运动学、轨迹规划和伺服控制都由控制运行时负责，本 crate 不涉及。

pub mod command;
pub mod error;
pub mod recording;
pub mod robot;
pub mod urscript;

pub use command::{RobotCommand, TightenTorqueParams, ToolCommand};
pub use error::RobotError;
pub use recording::{ClampState, GripperState, RecordingRobot, WorkspaceLimits};
pub use robot::Robot;
pub use urscript::UrScriptProgram;
