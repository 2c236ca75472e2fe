//! URScript 程序后端
//!
//! [`UrScriptProgram`] 把命令流渲染为一个 URScript 函数，可直接上传到 UR 控制器执行。
//!
//! - 位姿：毫米 → 米，欧拉角 → 旋转向量，写成 `p[x, y, z, rx, ry, rz]`
//! - 关节：角度 → 弧度
//! - 速度/加速度命令不产生语句，作为后续运动的 `a=`/`v=` 参数
//! - 工具命令原样插入（`rq_*` 由夹爪 URCap 提供，`clamp`/`unclamp`/`tighten_torque`
//!   由工位的控制器程序提供）

use crate::command::{RobotCommand, ToolCommand};
use crate::error::RobotError;
use crate::robot::Robot;
use flashlight_types::{MotionTarget, Pose};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// `movel` 默认加速度（m/s²）
const DEFAULT_LINEAR_ACCELERATION: f64 = 1.2;
/// `movel` 默认速度（m/s）
const DEFAULT_LINEAR_SPEED: f64 = 0.25;
/// `movej` 默认加速度（rad/s²）
const DEFAULT_JOINT_ACCELERATION: f64 = 1.4;
/// `movej` 默认速度（rad/s）
const DEFAULT_JOINT_SPEED: f64 = 1.05;

/// URScript 程序生成器
#[derive(Debug, Clone)]
pub struct UrScriptProgram {
    name: String,
    function: String,
    lines: Vec<String>,
    linear_speed: f64,
    linear_acceleration: f64,
    joint_speed: f64,
    joint_acceleration: f64,
}

impl UrScriptProgram {
    /// 创建新的程序
    ///
    /// `name` 是机器人实例名，`function` 是生成的 URScript 函数名
    /// （非标识符字符替换为 `_`）。
    pub fn new(name: impl Into<String>, function: &str) -> Self {
        Self {
            name: name.into(),
            function: sanitize_identifier(function),
            lines: Vec::new(),
            linear_speed: DEFAULT_LINEAR_SPEED,
            linear_acceleration: DEFAULT_LINEAR_ACCELERATION,
            joint_speed: DEFAULT_JOINT_SPEED,
            joint_acceleration: DEFAULT_JOINT_ACCELERATION,
        }
    }

    /// URScript 函数名
    pub fn function(&self) -> &str {
        &self.function
    }

    /// 函数体语句（不含缩进）
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 渲染完整程序
    pub fn render(&self) -> String {
        let mut out = format!("def {}():\n", self.function);
        for line in &self.lines {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("end\n");
        out
    }

    /// 写入任意输出
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), RobotError> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// 保存到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RobotError> {
        fs::write(path.as_ref(), self.render())?;
        debug!(path = %path.as_ref().display(), lines = self.lines.len(), "URScript program saved");
        Ok(())
    }

    fn render_target(target: &MotionTarget) -> String {
        match target {
            MotionTarget::Pose(pose) => render_pose(pose),
            MotionTarget::Joints(joints) => {
                let values: Vec<String> =
                    joints.iter().map(|d| format!("{:.6}", d.to_rad().0)).collect();
                format!("[{}]", values.join(", "))
            },
        }
    }

    fn positive(name: &str, value: f64) -> Result<f64, RobotError> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(RobotError::InvalidParameter(format!(
                "{} must be positive and finite, got {}",
                name, value
            )))
        }
    }
}

fn render_pose(pose: &Pose) -> String {
    let [rx, ry, rz] = pose.orientation.rotation_vector();
    format!(
        "p[{:.6}, {:.6}, {:.6}, {:.6}, {:.6}, {:.6}]",
        pose.x / 1000.0,
        pose.y / 1000.0,
        pose.z / 1000.0,
        rx,
        ry,
        rz
    )
}

fn sanitize_identifier(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

impl Robot for UrScriptProgram {
    fn name(&self) -> &str {
        &self.name
    }

    fn execute(&mut self, command: RobotCommand) -> Result<(), RobotError> {
        if let Some(target) = command.target()
            && !target.is_finite()
        {
            return Err(RobotError::InvalidParameter(format!(
                "non-finite motion target: {}",
                target
            )));
        }

        let line = match &command {
            RobotCommand::MoveJ(target) => Some(format!(
                "movej({}, a={}, v={})",
                Self::render_target(target),
                self.joint_acceleration,
                self.joint_speed
            )),
            RobotCommand::MoveL(target) => Some(format!(
                "movel({}, a={}, v={})",
                Self::render_target(target),
                self.linear_acceleration,
                self.linear_speed
            )),
            RobotCommand::SetSpeed(v) => {
                self.linear_speed = Self::positive("linear speed", *v)? / 1000.0;
                None
            },
            RobotCommand::SetAcceleration(a) => {
                self.linear_acceleration = Self::positive("linear acceleration", *a)? / 1000.0;
                None
            },
            RobotCommand::SetSpeedJoints(v) => {
                self.joint_speed = Self::positive("joint speed", *v)?.to_radians();
                None
            },
            RobotCommand::RunTool(tool) => {
                if let ToolCommand::TightenTorque(params) = tool {
                    params.validate()?;
                }
                Some(tool.code())
            },
        };

        trace!(robot = %self.name, %command, "Rendered command");
        if let Some(line) = line {
            self.lines.push(line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::TightenTorqueParams;
    use flashlight_types::{Deg, JointTarget, Orientation};

    #[test]
    fn test_empty_program() {
        let program = UrScriptProgram::new("UR5", "flashlight_assembly");
        assert_eq!(program.render(), "def flashlight_assembly():\nend\n");
    }

    #[test]
    fn test_function_name_is_sanitized() {
        assert_eq!(UrScriptProgram::new("UR5", "flash light-1").function(), "flash_light_1");
        assert_eq!(UrScriptProgram::new("UR5", "1st").function(), "_1st");
        assert_eq!(UrScriptProgram::new("UR5", "").function(), "_");
    }

    #[test]
    fn test_joint_move_in_radians_with_default_rates() {
        let mut program = UrScriptProgram::new("UR5", "p");
        let home = JointTarget::from_degrees([0.0, -90.0, 0.0, -90.0, 0.0, 0.0]);
        program.move_j(home.into()).unwrap();
        assert_eq!(
            program.lines(),
            ["movej([0.000000, -1.570796, 0.000000, -1.570796, 0.000000, 0.000000], a=1.4, v=1.05)"]
        );
    }

    #[test]
    fn test_speed_settings_apply_to_following_moves() {
        let mut program = UrScriptProgram::new("UR5", "p");
        program.set_speed(200.0).unwrap();
        program.set_acceleration(500.0).unwrap();
        program.set_speed_joints(180.0).unwrap();

        let pose = Pose::new(-322.98, 38.3, 250.0, Orientation::TOOL_DOWN);
        program.move_l(pose.into()).unwrap();
        program.move_j(JointTarget::default().into()).unwrap();

        assert_eq!(program.lines().len(), 2);
        assert!(program.lines()[0].ends_with("a=0.5, v=0.2)"), "{}", program.lines()[0]);
        let expected = format!("a=1.4, v={})", std::f64::consts::PI);
        assert!(program.lines()[1].ends_with(&expected), "{}", program.lines()[1]);
    }

    #[test]
    fn test_pose_rendered_in_meters() {
        let mut program = UrScriptProgram::new("UR5", "p");
        let pose = Pose::new(-322.98, 38.3, 250.0, Orientation::TOOL_DOWN);
        program.move_l(pose.into()).unwrap();

        let line = &program.lines()[0];
        assert!(line.starts_with("movel(p[-0.322980, 0.038300, 0.250000, "), "{line}");

        // 旋转向量模长为 π（绕 (1, -1, 0) 方向转 180°）
        let inner = line
            .trim_start_matches("movel(p[")
            .split(']')
            .next()
            .unwrap()
            .to_string();
        let values: Vec<f64> = inner.split(", ").map(|v| v.parse().unwrap()).collect();
        let angle = (values[3].powi(2) + values[4].powi(2) + values[5].powi(2)).sqrt();
        assert!((angle - std::f64::consts::PI).abs() < 1e-5);
        assert!(values[5].abs() < 1e-6);
        assert!((values[3] + values[4]).abs() < 1e-6);
    }

    #[test]
    fn test_tool_code_inserted_verbatim() {
        let mut program = UrScriptProgram::new("UR5", "p");
        program.run_tool(ToolCommand::Unclamp).unwrap();
        program.run_tool(ToolCommand::CloseAndWait).unwrap();
        assert_eq!(
            program.render(),
            "def p():\n  unclamp()\n  rq_close_and_wait()\nend\n"
        );
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let mut program = UrScriptProgram::new("UR5", "p");
        assert!(matches!(program.set_speed(0.0), Err(RobotError::InvalidParameter(_))));

        let pose = Pose::new(f64::NAN, 0.0, 0.0, Orientation::TOOL_DOWN);
        assert!(matches!(
            program.move_l(pose.into()),
            Err(RobotError::InvalidParameter(_))
        ));
        assert!(program.lines().is_empty());
    }

    #[test]
    fn test_save_and_write_to() {
        let mut program = UrScriptProgram::new("UR5", "p");
        program.run_tool(ToolCommand::Open).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.script");
        program.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), program.render());

        let mut buffer = Vec::new();
        program.write_to(&mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), program.render());
    }

    #[test]
    fn test_small_rates_never_render_as_zero() {
        let mut program = UrScriptProgram::new("UR5", "p");
        program.set_speed(0.04).unwrap();
        program.set_acceleration(0.0005).unwrap();
        program.move_l(Pose::new(-322.98, 38.3, 163.9, Orientation::TOOL_DOWN).into()).unwrap();

        let line = &program.lines()[0];
        let rates = line.rsplit("], ").next().unwrap().trim_end_matches(')');
        let (a, v) = rates.split_once(", ").unwrap();
        let a: f64 = a.trim_start_matches("a=").parse().unwrap();
        let v: f64 = v.trim_start_matches("v=").parse().unwrap();
        assert!((a - 0.0000005).abs() < 1e-15, "{line}");
        assert!((v - 0.00004).abs() < 1e-15, "{line}");
    }

    #[test]
    fn test_broken_torque_params_rejected() {
        let mut program = UrScriptProgram::new("UR5", "p");
        let params = TightenTorqueParams {
            torque_limit: f64::NAN,
            start_angle: Deg(f64::INFINITY),
            ..TightenTorqueParams::default()
        };
        assert!(matches!(
            program.run_tool(ToolCommand::TightenTorque(params)),
            Err(RobotError::InvalidParameter(_))
        ));
        assert!(program.lines().is_empty());
    }
}
