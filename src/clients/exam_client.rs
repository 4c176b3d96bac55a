/// 题库 API 客户端
///
/// 封装所有与题库服务相关的 HTTP 调用
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::clients::ExamApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AnswerMap, Attempt, AttemptStatistics, FullTestSet, NewAttempt, Section, SectionList,
    SectionQuestionSet, SectionStatistics, Submission, TestResult,
};

/// 题库 API 客户端
pub struct ExamClient {
    http: Client,
    base_url: String,
}

impl ExamClient {
    /// 创建新的题库客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::ClientBuildFailed)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 服务地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// 发送 GET 请求并解析 JSON
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("📤 GET {} {:?}", endpoint, query);

        let response = self
            .http
            .get(self.url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        Self::decode(endpoint, response).await
    }

    /// 发送 POST 请求并解析 JSON
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("📤 POST {}", endpoint);

        let response = self
            .http
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        Self::decode(endpoint, response).await
    }

    /// 检查状态码并解析响应体
    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::request_failed(endpoint, e))?;

        if !status.is_success() {
            let message = Self::extract_error_message(&body);
            warn!(
                "❌ API返回错误 ({}): status={}, message={:?}",
                endpoint,
                status.as_u16(),
                message
            );
            return Err(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        debug!("✅ {} {} ({} 字节)", status.as_u16(), endpoint, body.len());

        serde_json::from_str(&body).map_err(|e| ApiError::json_parse_failed(endpoint, e))
    }

    /// 提取错误响应里的 `error` 字段
    pub fn extract_error_message(body: &str) -> Option<String> {
        let value: Value = serde_json::from_str(body).ok()?;
        match value.get("error") {
            Some(Value::String(msg)) => Some(msg.clone()),
            Some(other) => Some(other.to_string()),
            None if value.is_object() => Some(value.to_string()),
            None => None,
        }
    }
}

#[async_trait]
impl ExamApi for ExamClient {
    async fn list_sections(&self) -> Result<Vec<Section>, ApiError> {
        let list: SectionList = self.get_json("sections/", &[]).await?;
        Ok(list.into_vec())
    }

    async fn get_section(&self, section_id: &str) -> Result<Section, ApiError> {
        self.get_json(&format!("sections/{}/", section_id), &[])
            .await
    }

    async fn section_statistics(&self, section_id: &str) -> Result<SectionStatistics, ApiError> {
        self.get_json(&format!("sections/{}/statistics/", section_id), &[])
            .await
    }

    async fn random_full_test(&self) -> Result<FullTestSet, ApiError> {
        self.get_json("questions/random_full_test/", &[]).await
    }

    async fn questions_by_section(
        &self,
        section_id: &str,
        random: Option<u32>,
    ) -> Result<SectionQuestionSet, ApiError> {
        let mut query = vec![("section_id", section_id.to_string())];
        if let Some(count) = random {
            query.push(("random", count.to_string()));
        }
        self.get_json("questions/by_section/", &query).await
    }

    async fn create_attempt(&self, request: &NewAttempt) -> Result<Attempt, ApiError> {
        debug!("➕ 创建测试记录: {:?}", request);
        self.post_json("attempts/", request).await
    }

    async fn submit_attempt(
        &self,
        attempt_id: u64,
        answers: &AnswerMap,
    ) -> Result<TestResult, ApiError> {
        debug!("📨 提交测试 #{}，共 {} 个答案", attempt_id, answers.len());
        self.post_json(
            &format!("attempts/{}/submit/", attempt_id),
            &Submission { answers },
        )
        .await
    }

    async fn get_attempt(&self, attempt_id: u64) -> Result<Attempt, ApiError> {
        self.get_json(&format!("attempts/{}/", attempt_id), &[])
            .await
    }

    async fn attempt_statistics(&self) -> Result<AttemptStatistics, ApiError> {
        self.get_json("attempts/statistics/", &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trims_trailing_slash() {
        let config = Config {
            api_base_url: "http://localhost:8000/api/".to_string(),
            ..Config::default()
        };
        let client = ExamClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url("attempts/5/submit/"),
            "http://localhost:8000/api/attempts/5/submit/"
        );
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            ExamClient::extract_error_message(r#"{"error": "القسم غير موجود"}"#),
            Some("القسم غير موجود".to_string())
        );
        // DRF 的校验错误没有 error 字段，整体返回
        assert_eq!(
            ExamClient::extract_error_message(r#"{"answers": ["required"]}"#),
            Some(r#"{"answers":["required"]}"#.to_string())
        );
        assert_eq!(ExamClient::extract_error_message("<html>502</html>"), None);
    }

    /// 测试真实服务连通性
    ///
    /// 运行方式：
    /// ```bash
    /// API_BASE_URL=http://localhost:8000/api cargo test test_live_sections -- --ignored --nocapture
    /// ```
    #[tokio::test]
    #[ignore]
    async fn test_live_sections() {
        let _ = tracing_subscriber::fmt::try_init();

        let config = Config::from_env().unwrap();
        let client = ExamClient::new(&config).unwrap();

        let sections = client.list_sections().await.unwrap();
        println!("找到 {} 个分区", sections.len());
        for s in &sections {
            println!("  {} ({} 题)", s.section_id, s.question_count);
        }
        assert!(!sections.is_empty());
    }
}
