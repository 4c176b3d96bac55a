//! 页面分派集成测试
//!
//! 通过 `App::with_api` 注入内存题库，检查每个页面访问了哪些接口以及最终停在哪个页面

mod common;

use std::sync::Arc;

use tokio_test::assert_ok;

use driving_theory_client::{App, Config, Route};

use common::FakeExamApi;

fn app(api: FakeExamApi) -> (Arc<FakeExamApi>, App) {
    let api = Arc::new(api);
    let app = App::with_api(Config::default(), api.clone());
    (api, app)
}

#[tokio::test]
async fn test_home_shows_statistics() {
    let (api, app) = app(FakeExamApi::default());

    let shown = assert_ok!(app.run(Route::Home).await);

    assert_eq!(shown, Route::Home);
    assert_eq!(api.calls(), vec!["attempt_statistics"]);
}

#[tokio::test]
async fn test_home_survives_statistics_failure() {
    let (api, app) = app(FakeExamApi {
        fail_statistics: true,
        ..FakeExamApi::default()
    });

    let shown = assert_ok!(app.run(Route::Home).await);

    assert_eq!(shown, Route::Home);
    assert_eq!(api.calls(), vec!["attempt_statistics"]);
}

#[tokio::test]
async fn test_sections_page() {
    let (api, app) = app(FakeExamApi::default());

    let shown = assert_ok!(app.run(Route::Sections).await);

    assert_eq!(shown, Route::Sections);
    assert_eq!(api.calls(), vec!["list_sections"]);
}

#[tokio::test]
async fn test_sections_load_error_falls_back_to_home() {
    let (api, app) = app(FakeExamApi {
        fail_sections: true,
        ..FakeExamApi::default()
    });

    // 加载失败不再向上传播，而是提示后回到首页
    let shown = assert_ok!(app.run(Route::Sections).await);

    assert_eq!(shown, Route::Home);
    assert_eq!(api.calls(), vec!["list_sections", "attempt_statistics"]);
}

#[tokio::test]
async fn test_section_detail_with_statistics() {
    let (api, app) = app(FakeExamApi::with_questions(3));

    let route = Route::SectionDetail("traffic_rules".to_string());
    let shown = assert_ok!(app.run(route.clone()).await);

    assert_eq!(shown, route);
    assert_eq!(
        api.calls(),
        vec![
            "get_section:traffic_rules",
            "section_statistics:traffic_rules"
        ]
    );
}

#[tokio::test]
async fn test_section_detail_survives_statistics_failure() {
    let (api, app) = app(FakeExamApi {
        fail_statistics: true,
        ..FakeExamApi::default()
    });

    let route = Route::SectionDetail("traffic_rules".to_string());
    let shown = assert_ok!(app.run(route.clone()).await);

    assert_eq!(shown, route);
    assert_eq!(
        api.calls(),
        vec![
            "get_section:traffic_rules",
            "section_statistics:traffic_rules"
        ]
    );
}

#[tokio::test]
async fn test_section_detail_load_error_falls_back_to_home() {
    let (api, app) = app(FakeExamApi {
        fail_section: true,
        ..FakeExamApi::default()
    });

    let shown = assert_ok!(app.run(Route::SectionDetail("missing".to_string())).await);

    assert_eq!(shown, Route::Home);
    // 详情加载失败后不再请求统计
    assert_eq!(api.calls(), vec!["get_section:missing", "attempt_statistics"]);
}

#[tokio::test]
async fn test_results_without_test_falls_back_to_home() {
    let (api, app) = app(FakeExamApi::default());

    let shown = assert_ok!(app.run(Route::Results).await);

    assert_eq!(shown, Route::Home);
    assert_eq!(api.calls(), vec!["attempt_statistics"]);
}
