//! 会话层
//!
//! - `state` - 会话状态与纯转换
//! - `store` - 唯一的状态持有者，广播每次变更
//! - `timer` - 倒计时（纯 tick 函数 + 可取消的后台任务）

pub mod state;
pub mod store;
pub mod timer;

pub use state::{SessionState, DEFAULT_DURATION_SECS};
pub use store::SessionStore;
pub use timer::{ClockDisplay, CountdownTimer, Tick, LOW_TIME_THRESHOLD_SECS};
