//! DNS client tests against a local mock server.

mod common;

use common::{test_config, BASIC_AUTH};
use miabctl_client::{DnsClient, Error, NetworkType, ResourceType};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============ get ============

#[tokio::test]
async fn get_returns_records_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/dns/custom"))
        .and(header("Authorization", BASIC_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"qname": "test.example.org", "rtype": "A", "value": "127.0.0.1"},
                {"qname": "*.example.org", "rtype": "A", "value": "127.0.0.2"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let records = require_ok!(client.get("", ResourceType::None).await);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].qname, "test.example.org");
    assert_eq!(records[0].rtype, ResourceType::A);
    assert_eq!(records[0].value, "127.0.0.1");
    assert_eq!(records[1].qname, "*.example.org");
    assert_eq!(records[1].value, "127.0.0.2");
}

#[tokio::test]
async fn get_filters_by_qname_and_rtype_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/dns/custom/test.example.org/A"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"qname": "test.example.org", "rtype": "A", "value": "127.0.0.1"}]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let records = require_ok!(client.get("test.example.org", ResourceType::A).await);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn get_rejects_invalid_qname_before_any_request() {
    let server = MockServer::start().await;
    // No mock mounted: a request would come back 404 and fail differently.

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(client.get("fooBar", ResourceType::A).await);
    assert!(
        matches!(&err, Error::Validation { field, .. } if field == "qname"),
        "unexpected {err:?}"
    );
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn get_surfaces_http_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/dns/custom"))
        .respond_with(ResponseTemplate::new(503).set_body_string("No Gateway"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(client.get("", ResourceType::None).await);
    assert!(
        matches!(&err, Error::Http { status: 503, body } if body == "No Gateway"),
        "unexpected {err:?}"
    );
    assert_eq!(err.to_string(), "response error (503): No Gateway");
}

#[tokio::test]
async fn get_surfaces_decode_error_on_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/dns/custom"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"test.example.org\", \"A\""))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(client.get("", ResourceType::None).await);
    assert!(matches!(&err, Error::Decode { .. }), "unexpected {err:?}");
}

// ============ set / add / delete ============

#[tokio::test]
async fn set_issues_put_with_raw_value_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/dns/custom/test.example.org/A"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_string("127.0.0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated DNS: test.example.org"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let updated = require_ok!(
        client
            .set("test.example.org", ResourceType::A, "127.0.0.1")
            .await
    );
    assert!(updated);
}

#[tokio::test]
async fn add_issues_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/dns/custom/test.example.org/TXT"))
        .and(body_string("FooBar"))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated DNS:"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let updated = require_ok!(
        client
            .add("test.example.org", ResourceType::Txt, "FooBar")
            .await
    );
    assert!(updated);
}

#[tokio::test]
async fn delete_issues_delete_with_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/dns/custom/test.example.org/A"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated DNS:"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let updated = require_ok!(client.delete("test.example.org", ResourceType::A, "").await);
    assert!(updated);
}

#[tokio::test]
async fn write_rejects_unset_rtype_before_any_request() {
    let server = MockServer::start().await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(
        client
            .set("test.example.org", ResourceType::None, "127.0.0.1")
            .await
    );
    assert!(
        matches!(&err, Error::Validation { field, .. } if field == "rtype"),
        "unexpected {err:?}"
    );
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn write_treats_unknown_200_body_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_string("nothing changed"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(
        client
            .set("test.example.org", ResourceType::A, "127.0.0.1")
            .await
    );
    assert!(
        matches!(&err, Error::UnexpectedResponse { body } if body == "nothing changed"),
        "unexpected {err:?}"
    );
}

#[tokio::test]
async fn write_surfaces_http_error_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503).set_body_string("updated DNS:"))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(
        client
            .delete("test.example.org", ResourceType::A, "127.0.0.1")
            .await
    );
    assert!(
        matches!(&err, Error::Http { status: 503, .. }),
        "unexpected {err:?}"
    );
}

// ============ dynamic address records ============

#[tokio::test]
async fn update_dns4_puts_empty_value_for_remote_address() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/dns/custom/home.example.org/A"))
        .and(header("Authorization", BASIC_AUTH))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_string("updated DNS: 192.0.2.1"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let updated = require_ok!(client.update_dns4("home.example.org", "").await);
    assert!(updated);
}

#[tokio::test]
async fn address_record_accepts_plain_ok_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/dns/custom/home.example.org/A"))
        .and(body_string("192.0.2.7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let updated = require_ok!(
        client
            .set_or_add_address_record(NetworkType::Tcp4, "home.example.org", "192.0.2.7", true)
            .await
    );
    assert!(updated);
}

#[tokio::test]
async fn address_record_rejects_invalid_qname_before_any_request() {
    let server = MockServer::start().await;

    let config = test_config(&server);
    let client = DnsClient::new(&config);
    let err = require_err!(
        client
            .set_or_add_address_record(NetworkType::Tcp4, "test,example,org", "", false)
            .await
    );
    assert!(
        matches!(&err, Error::Validation { field, .. } if field == "qname"),
        "unexpected {err:?}"
    );
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
