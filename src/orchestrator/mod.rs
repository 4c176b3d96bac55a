//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 持有配置、题库客户端（`Arc<dyn ExamApi>`）和会话容器
//! - 按路由分派到首页、分区列表、分区详情、考试、成绩页
//!
//! ### `exam_runner` - 终端考试运行器
//! - 把终端输入翻译为流程操作
//! - 管理倒计时句柄的生命周期
//! - 展示成绩并写入报告
//!
//! ## 层次关系
//!
//! ```text
//! app (按路由分派)
//!     ↓
//! exam_runner (一次测试的交互循环)
//!     ↓
//! workflow::TestFlow (加载 / 作答 / 提交)
//!     ↓
//! session (状态容器 + 倒计时)   clients (ExamApi)
//! ```

pub mod app;
pub mod exam_runner;

pub use app::App;
pub use exam_runner::{Command, ExamRunner, RunOutcome};
