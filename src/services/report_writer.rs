//! 成绩报告写入服务 - 业务能力层
//!
//! 只负责"把成绩页追加到报告文件"能力，不关心流程

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::TestType;
use crate::results::ResultsView;

/// 成绩报告写入服务
///
/// 每次追加一条带时间戳表头的成绩页文本，不覆盖已有内容
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 追加一份成绩报告
    pub async fn write(&self, view: &ResultsView) -> AppResult<()> {
        let entry = render_entry(view, chrono::Local::now());
        debug!(
            "写入成绩报告: {} | 长度: {}",
            self.report_file_path,
            entry.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)
            .await
            .map_err(|e| AppError::file(&self.report_file_path, e))?;

        file.write_all(entry.as_bytes())
            .await
            .map_err(|e| AppError::file(&self.report_file_path, e))?;
        // tokio 的文件写入在后台完成，flush 之后才算落盘
        file.flush()
            .await
            .map_err(|e| AppError::file(&self.report_file_path, e))?;

        info!("📝 成绩报告已保存至: {}", self.report_file_path);
        Ok(())
    }
}

fn render_entry<Tz>(view: &ResultsView, at: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let kind = match view.mode {
        Some(TestType::Full) => "完整考试",
        Some(TestType::Section) => "分区练习",
        None => "未知",
    };
    format!(
        "{}\n成绩报告 - {} - {}\n{}\n",
        "#".repeat(60),
        kind,
        at.format("%Y-%m-%d %H:%M:%S"),
        view
    )
}
