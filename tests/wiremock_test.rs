//! 用 wiremock 校验请求参数和 token 缓存

use std::sync::Arc;

use publisher_stat::{
    AccessTokenProvider, AdSlot, CredentialTokenProvider, StatConfig, StatError,
    StaticTokenProvider, StatsClient, TokenError,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn empty_page() -> serde_json::Value {
    json!({
        "base_resp": { "err_msg": "ok", "ret": 0 },
        "list": [],
        "summary": {},
        "total_num": 0
    })
}

fn static_client(config: &StatConfig) -> StatsClient {
    StatsClient::from_config(config, Arc::new(StaticTokenProvider::new("ACCESS_TOKEN"))).unwrap()
}

#[tokio::test]
async fn ad_slot_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publisher/stat"))
        .and(query_param("action", "publisher_adpos_general"))
        .and(query_param("access_token", "ACCESS_TOKEN"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "30"))
        .and(query_param("start_date", "2024-06-01"))
        .and(query_param("end_date", "2024-06-30"))
        .and(query_param("ad_slot", "SLOT_ID_BIZ_MID_CONTEXT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(1)
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let client = static_client(&config);

    let stats = client
        .fetch_ad_pos_stats("2024-06-01", "2024-06-30", 2, 30, Some(AdSlot::BizMidContext))
        .await
        .unwrap();
    assert_eq!(stats.total_num, 0);
    assert!(stats.list.is_empty());
}

#[tokio::test]
async fn missing_ad_slot_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publisher/stat"))
        .and(query_param("action", "publisher_adpos_general"))
        .and(query_param_is_missing("ad_slot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(1)
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let client = static_client(&config);

    client
        .fetch_ad_pos_stats("2024-06-01", "2024-06-30", 1, 10, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn server_error_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/publisher/stat"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let client = static_client(&config);

    let err = client
        .fetch_settlement_stats("2024-06-01", "2024-06-30", 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, StatError::Transport(_)), "got {err:?}");
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn credential_token_is_cached_between_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .and(query_param("appid", "wx_app"))
        .and(query_param("secret", "wx_secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "CACHED_TOKEN",
            "expires_in": 7200
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publisher/stat"))
        .and(query_param("access_token", "CACHED_TOKEN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(3)
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let tokens = Arc::new(CredentialTokenProvider::new(&config, "wx_app", "wx_secret").unwrap());
    let client = StatsClient::from_config(&config, tokens).unwrap();

    client.fetch_ad_pos_stats("2024-06-01", "2024-06-01", 1, 10, None).await.unwrap();
    client.fetch_cps_stats("2024-06-01", "2024-06-01", 1, 10).await.unwrap();
    client.fetch_settlement_stats("2024-06-01", "2024-06-01", 1, 10).await.unwrap();
}

#[tokio::test]
async fn short_lived_token_is_refetched() {
    let server = MockServer::start().await;
    // 有效期短于刷新余量，每次都要重新获取
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "SHORT_TOKEN",
            "expires_in": 60
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let tokens = CredentialTokenProvider::new(&config, "wx_app", "wx_secret").unwrap();
    assert_eq!(tokens.access_token().await.unwrap(), "SHORT_TOKEN");
    assert_eq!(tokens.access_token().await.unwrap(), "SHORT_TOKEN");
}

#[tokio::test]
async fn token_endpoint_errcode_fails_without_stat_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errcode": 40125,
            "errmsg": "invalid appsecret"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/publisher/stat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(0)
        .mount(&server)
        .await;

    let config = StatConfig::with_base_url(&server.uri());
    let tokens = Arc::new(CredentialTokenProvider::new(&config, "wx_app", "bad").unwrap());
    let client = StatsClient::from_config(&config, tokens).unwrap();

    let err = client
        .fetch_cps_stats("2024-06-01", "2024-06-01", 1, 10)
        .await
        .unwrap_err();
    match err {
        StatError::Token(TokenError::Remote { code, message }) => {
            assert_eq!(code, 40125);
            assert_eq!(message, "invalid appsecret");
        }
        other => panic!("expected token error, got {other:?}"),
    }
}
