pub mod route;
pub mod test_flow;
pub mod test_request;

pub use route::Route;
pub use test_flow::{FailureReason, FlowState, TestFlow};
pub use test_request::{TestKind, TestRequest};
