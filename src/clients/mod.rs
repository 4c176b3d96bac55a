pub mod exam_api;
pub mod exam_client;

pub use exam_api::ExamApi;
pub use exam_client::ExamClient;
