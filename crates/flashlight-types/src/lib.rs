//! # Flashlight Types
//!
//! 装配工位共享的纯数据类型（无状态、无硬件依赖）。
//!
//! ## 包含模块
//!
//! - `units` - 强类型角度（`Deg`、`Rad`）
//! - `joint` - 关节索引与关节目标（`Joint`、`JointArray`、`JointTarget`）
//! - `pose` - 工具位姿与运动目标（`Orientation`、`Pose`、`MotionTarget`）
//!
//! ## Feature Flags
//!
//! - `serde` - 为所有类型派生 `Serialize` / `Deserialize`

pub mod joint;
pub mod pose;
pub mod units;

pub use joint::{Joint, JointArray, JointTarget};
pub use pose::{MotionTarget, Orientation, Pose};
pub use units::{Deg, Rad};
