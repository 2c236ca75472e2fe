//! 驱动层错误类型定义

use flashlight_types::Joint;
use thiserror::Error;

/// 机器人后端错误类型
///
/// 控制运行时在目标不可达、关节超限或工具故障时抛出错误，
/// 装配序列在第一个错误处停止，不做重试。
#[derive(Error, Debug)]
pub enum RobotError {
    /// 目标不可达
    #[error("Target unreachable: {target} ({reason})")]
    Unreachable {
        /// 目标描述
        target: String,
        /// 不可达原因
        reason: String,
    },

    /// 关节限位超出
    #[error("Joint {joint} limit exceeded: {value:.3}° (limit: ±{limit:.3}°)")]
    JointLimitExceeded {
        /// 关节索引
        joint: Joint,
        /// 实际值（度）
        value: f64,
        /// 限位值（度）
        limit: f64,
    },

    /// 无效参数（非有限值、非正速度等）
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// 工具（夹爪、夹具、拧紧程序）故障
    #[error("Tool fault in `{code}`: {reason}")]
    ToolFault {
        /// 工具代码
        code: String,
        /// 故障原因
        reason: String,
    },

    /// 命令被后端拒绝
    #[error("Command #{index} rejected: {command}")]
    CommandRejected {
        /// 命令序号（从 0 开始）
        index: usize,
        /// 命令描述
        command: String,
    },

    /// 输出 I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_error_display() {
        let err = RobotError::Unreachable {
            target: "Pose(0, 0, 900)".to_string(),
            reason: "outside reach".to_string(),
        };
        assert_eq!(
            format!("{}", err),
            "Target unreachable: Pose(0, 0, 900) (outside reach)"
        );

        let err = RobotError::JointLimitExceeded {
            joint: Joint::J6,
            value: 400.0,
            limit: 360.0,
        };
        assert_eq!(
            format!("{}", err),
            "Joint J6 limit exceeded: 400.000° (limit: ±360.000°)"
        );

        let err = RobotError::ToolFault {
            code: "tighten_torque".to_string(),
            reason: "clamp released".to_string(),
        };
        assert!(format!("{}", err).contains("tighten_torque"));

        let err = RobotError::CommandRejected {
            index: 3,
            command: "rq_open()".to_string(),
        };
        assert_eq!(format!("{}", err), "Command #3 rejected: rq_open()");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: RobotError = io.into();
        assert!(matches!(err, RobotError::Io(_)));
        assert!(format!("{}", err).contains("pipe closed"));
    }
}
