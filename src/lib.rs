//! # Driving Theory Client
//!
//! 驾驶理论模拟考试的终端客户端：分区浏览、随机组卷、计时作答、交卷评分与答案回顾。
//! 题库、评分和测试记录全部由远端服务持有，本 crate 只负责状态编排与展示。
//!
//! ## 架构设计
//!
//! ### ① 接入层（Clients）
//! - `clients/` - 题库服务的 HTTP 调用
//! - `ExamApi` - 流程层依赖的 trait，测试时替换为内存实现
//! - `ExamClient` - 基于 reqwest 的实现
//!
//! ### ② 会话层（Session）
//! - `session/` - 一次测试的客户端状态
//! - `SessionStore` - 唯一的状态持有者，每次变更广播给所有订阅者
//! - `CountdownTimer` - 纯 tick 函数 + 可取消的后台任务
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次测试"的完整生命周期
//! - `TestRequest` / `Route` - 路由参数
//! - `TestFlow` - 状态机（Loading → Ready → Submitting → Done / Failed）
//!
//! ### ④ 展示与编排（Results / Orchestration）
//! - `results/` - 成绩汇总与逐题回顾
//! - `services/` - 成绩报告写入
//! - `orchestrator/` - 按路由分派，驱动终端交互
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod results;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ExamApi, ExamClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{Language, Question, Section, TestResult, TestType};
pub use orchestrator::{App, ExamRunner};
pub use results::ResultsView;
pub use session::{SessionState, SessionStore};
pub use workflow::{FlowState, Route, TestFlow, TestRequest};
