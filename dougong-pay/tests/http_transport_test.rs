//! HTTP transport tests against a local mock gateway.
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | POST | `/v3/trade/payment/scanpay/query` | `test_post_sends_envelope_as_json` |
//! | POST | `/v3/trade/payment/scanpay/refund` | `test_client_error_body_is_returned` |
//! | POST | `/v3/trade/payment/scanpay/query` | `test_server_error_without_json_is_transport_error` |
//! | GET  | `/v2/custom` | `test_get_sends_envelope_as_query` |

mod common;

use common::{PRODUCT_ID, SYS_ID, credentials, params};
use dougong_pay::{
    DougongClient, HttpTransport, PayError, Transport,
    request::SignedEnvelope,
    transport::{HttpConfig, HttpMethod, TransportRequest},
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn insecure_transport() -> HttpTransport {
    let config = HttpConfig { allow_insecure: true, timeout_secs: 5, ..HttpConfig::default() };
    HttpTransport::with_config(&config).expect("should build transport")
}

fn client(server: &MockServer) -> DougongClient {
    DougongClient::with_transport(credentials(&server.uri()), insecure_transport())
}

fn query_input() -> dougong_pay::Params {
    params(json!({ "huifu_id": "6666000000000000", "org_req_seq_id": "ORDER_1" }))
}

#[tokio::test]
async fn test_post_sends_envelope_as_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/trade/payment/scanpay/query"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "sys_id": SYS_ID,
            "product_id": PRODUCT_ID,
            "data": { "huifu_id": "6666000000000000", "org_req_seq_id": "ORDER_1" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "resp_code": "00000000", "trans_stat": "S" },
            "sign": "c2ln",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let response = client.query(&query_input()).await.expect("should succeed");
    assert_eq!(response["data"]["trans_stat"], json!("S"));

    let received = server.received_requests().await.expect("recording enabled");
    let body: Value = received[0].body_json().expect("JSON body");
    let keys: Vec<&str> = body.as_object().expect("object").keys().map(String::as_str).collect();
    assert_eq!(keys, ["sys_id", "product_id", "data", "sign"]);

    let data = body["data"].as_object().expect("data object");
    let sign = body["sign"].as_str().expect("sign string");
    assert!(client.signer().verify_sync_response(data, sign).expect("key parses"));
}

#[tokio::test]
async fn test_client_error_body_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/trade/payment/scanpay/refund"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "data": { "resp_code": "10000000", "resp_desc": "ord_amt不能为空" },
        })))
        .mount(&server)
        .await;

    let input = params(json!({
        "req_date": "20250102",
        "req_seq_id": "REFUND_1",
        "huifu_id": "6666000000000000",
        "ord_amt": "0.01",
        "org_req_date": "20250101",
        "org_hf_seq_id": "0030default220825182711P099ac1f343f00000",
    }));

    let response = client(&server).refund(&input).await.expect("4xx body is data");
    assert_eq!(response["data"]["resp_code"], json!("10000000"));
}

#[tokio::test]
async fn test_server_error_without_json_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client(&server).query(&query_input()).await.expect_err("should fail");
    assert!(err.is_transport(), "{err}");
}

#[tokio::test]
async fn test_success_without_json_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let err = client(&server).query(&query_input()).await.expect_err("should fail");
    assert!(matches!(err, PayError::Protocol(_)), "{err}");
}

#[tokio::test]
async fn test_get_sends_envelope_as_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/custom"))
        .and(query_param("sys_id", SYS_ID))
        .and(query_param("product_id", PRODUCT_ID))
        .and(query_param("data", r#"{"huifu_id":"6666000000000000"}"#))
        .and(query_param("sign", "c2ln"))
        .and(header("x-request-source", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let request = TransportRequest {
        method: HttpMethod::Get,
        url: format!("{}/v2/custom", server.uri()),
        envelope: SignedEnvelope {
            sys_id: SYS_ID.to_owned(),
            product_id: PRODUCT_ID.to_owned(),
            data: params(json!({ "huifu_id": "6666000000000000" })),
            sign: "c2ln".to_owned(),
        },
        headers: vec![("X-Request-Source".to_owned(), "test".to_owned())],
    };

    let response = insecure_transport().send(&request).await.expect("should succeed");
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"{}");
}

#[tokio::test]
async fn test_default_transport_refuses_plain_http() {
    let server = MockServer::start().await;
    let client = DougongClient::new(credentials(&server.uri())).expect("should build client");

    let err = client.query(&query_input()).await.expect_err("http must be refused");
    assert!(matches!(err, PayError::Transport(_)), "{err}");
    assert!(server.received_requests().await.expect("recording enabled").is_empty());
}

#[tokio::test]
async fn test_https_loopback_base_uri_is_attempted() {
    let server = MockServer::start().await;
    let https_uri = server.uri().replacen("http://", "https://", 1);
    let client = DougongClient::new(credentials(&https_uri)).expect("should build client");

    // The mock server speaks plain HTTP, so the TLS handshake fails inside reqwest.
    let err = client.query(&query_input()).await.expect_err("handshake must fail");
    assert!(matches!(err, PayError::Http(_)), "{err}");
}
