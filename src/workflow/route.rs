//! 页面路由
//!
//! `/`、`/sections`、`/section/{id}`、`/test/full`、`/test/section/{id}`、`/results`，
//! 测试路由可带 `?timer=true` 与 `&random=N`

use std::str::FromStr;

use crate::error::RouteError;
use crate::workflow::test_request::TestRequest;

/// 可导航的页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Sections,
    SectionDetail(String),
    Test(TestRequest),
    Results,
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, query) = s.trim().split_once('?').unwrap_or((s.trim(), ""));
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();

        let params: Vec<(&str, &str)> = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        let param = |name: &str| {
            params
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| *v)
        };
        let with_timer = param("timer") == Some("true");
        let random = param("random").and_then(|v| v.parse().ok());

        match segments.as_slice() {
            [] => Ok(Route::Home),
            ["sections"] => Ok(Route::Sections),
            ["section", id] => Ok(Route::SectionDetail(id.to_string())),
            ["results"] => Ok(Route::Results),
            ["test", "full"] => Ok(Route::Test(TestRequest::full(with_timer))),
            ["test", "section"] => Err(RouteError::MissingSectionId),
            ["test", "section", id] => {
                let request = TestRequest::section(*id, with_timer);
                Ok(Route::Test(match random {
                    Some(count) => request.with_random(count),
                    None => request,
                }))
            }
            _ => Err(RouteError::Unknown(s.to_string())),
        }
    }
}
