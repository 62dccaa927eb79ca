use appenlight::{AppEnlightClient, Log, LogLevel, Scheme, SendOutcome, Settings};
use mockito::Matcher;
use serde_json::{json, Value};

const DATE: &str = "2024-05-01T10:00:00.000";

fn settings_for(server: &mockito::Server) -> Settings {
    Settings::new("ak_test_key")
        .with_host(server.host_with_port())
        .with_scheme(Scheme::Http)
}

#[test]
fn ships_batch_over_http() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/logs")
        .match_query(Matcher::UrlEncoded("protocol_version".into(), "0.5".into()))
        .match_header("content-type", "application/json")
        .match_header("x-errormator-api-key", "ak_test_key")
        .match_body(Matcher::Json(json!([
            {"log_level": "INFO", "message": "first", "date": DATE},
            {"log_level": "ERROR", "message": "second", "date": DATE}
        ])))
        .with_status(200)
        .with_body("OK: accepted")
        .create();

    let mut client = AppEnlightClient::new(settings_for(&server)).unwrap();
    assert!(!client.transport().is_connected());

    client
        .add_log(Log::new(LogLevel::Info, "first").date(DATE))
        .add_log(Log::new(LogLevel::Error, "second").date(DATE));

    assert_eq!(client.send_logs(), SendOutcome::Success);
    assert!(client.transport().is_connected());
    assert_eq!(client.pending_logs(), 0);
    mock.assert();
}

#[test]
fn error_status_body_is_returned_as_diagnostic() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/reports")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":"bad key"}"#)
        .create();

    let mut client = AppEnlightClient::new(settings_for(&server)).unwrap();
    let outcome = client.send("reports");

    assert_eq!(outcome, SendOutcome::Diagnostic(json!({"error": "bad key"})));
    mock.assert();
}

#[test]
fn agent_is_reused_across_sends() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/logs")
        .match_query(Matcher::Any)
        .with_body("OK!")
        .expect(2)
        .create();

    let mut client = AppEnlightClient::new(settings_for(&server)).unwrap();
    assert!(client.send_logs().is_success());
    assert!(client.send_logs().is_success());
    mock.assert();
}

#[test]
fn non_utf8_ok_reply_is_success() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/reports")
        .match_query(Matcher::Any)
        .with_body(b"OK\xff\xfe".as_slice())
        .create();

    let mut client = AppEnlightClient::new(settings_for(&server)).unwrap();
    assert_eq!(client.send_reports(), SendOutcome::Success);
    mock.assert();
}

#[test]
fn unreachable_service_reads_as_null() {
    let settings = Settings::new("ak_test_key")
        .with_host("127.0.0.1:1")
        .with_scheme(Scheme::Http);
    let mut client = AppEnlightClient::new(settings).unwrap();
    client.add_log(Log::new(LogLevel::Critical, "dropped"));

    assert_eq!(client.send_logs(), SendOutcome::Diagnostic(Value::Null));
    assert_eq!(client.pending_logs(), 0);
}
