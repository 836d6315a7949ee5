//! Integration tests against a mock parsing service.
//!
//! Each test starts a `mockito` server standing in for `POST /api/parse` and
//! drives a `Session` through its real `HttpTransport`.

use mockito::Matcher;
use serde_json::json;
use stmtparse::error::{MSG_CONNECTIVITY, MSG_NOT_A_PDF, MSG_NO_FILE, MSG_PARSE_FAILED};
use stmtparse::{
    render, ClientConfig, FileRef, HttpTransport, Session, SubmissionState, PDF_MEDIA_TYPE,
};
use std::time::Duration;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn statement() -> FileRef {
    FileRef::new(
        "hdfc_jan.pdf",
        PDF_MEDIA_TYPE,
        b"%PDF-1.4\nstatement body\n%%EOF\n".to_vec(),
    )
}

fn session_for(url: &str) -> (Session, HttpTransport) {
    let config = ClientConfig::builder().base_url(url).build().unwrap();
    let transport = HttpTransport::new(&config).unwrap();
    (Session::new(config), transport)
}

fn assert_initial(session: &Session) {
    let initial = Session::new(session.config().clone());
    assert_eq!(render(session), render(&initial));
    assert!(session.candidate().is_none());
    assert_eq!(session.state(), &SubmissionState::Idle);
}

const HDFC_SUCCESS: &str = r#"{
    "status": "success",
    "issuer": "HDFC",
    "card_last_4": "1234",
    "statement_date": "2024-01-01",
    "payment_due_date": "2024-01-20",
    "total_balance": "500.00",
    "minimum_payment": "50.00"
}"#;

// ── Success ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn success_response_renders_result_card() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/parse")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=.+".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file""#.into()),
            Matcher::Regex(r#"filename="hdfc_jan.pdf""#.into()),
            Matcher::Regex("(?i)content-type: application/pdf".into()),
            Matcher::Regex("statement body".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(HDFC_SUCCESS)
        .expect(1)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    let state = session.submit(&transport).await.unwrap().clone();
    mock.assert_async().await;

    assert!(matches!(state, SubmissionState::Succeeded(_)));
    let view = render(&session);
    assert!(view.error.is_none());
    let card = view.result.expect("result card");
    assert_eq!(card.value("Issuer"), Some("HDFC"));
    assert_eq!(card.value("Card Last 4 Digits"), Some("**** 1234"));
    assert_eq!(card.value("Statement Date"), Some("2024-01-01"));
    assert_eq!(card.value("Payment Due Date"), Some("2024-01-20"));
    assert_eq!(card.value("Total Balance"), Some("$500.00"));
    assert_eq!(card.value("Minimum Payment"), Some("$50.00"));
}

#[tokio::test]
async fn numeric_amounts_are_accepted() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "status": "success",
        "issuer": "AXIS",
        "card_last_4": "9876",
        "statement_date": "05/01/2024",
        "payment_due_date": "05/21/2024",
        "total_balance": 1234.56,
        "minimum_payment": 35
    });
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    let card = render(&session).result.expect("result card");
    assert_eq!(card.value("Total Balance"), Some("$1234.56"));
    assert_eq!(card.value("Minimum Payment"), Some("$35"));
}

// ── Application errors ───────────────────────────────────────────────────────

#[tokio::test]
async fn failure_message_is_shown_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(400)
        .with_body(r#"{"message":"Unsupported issuer"}"#)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    let view = render(&session);
    assert_eq!(view.error.as_deref(), Some("Unsupported issuer"));
    assert!(view.result.is_none());
}

#[tokio::test]
async fn failure_without_message_falls_back_to_generic_text() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(400)
        .with_body(r#"{"error":"No file provided"}"#)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    assert_eq!(render(&session).error.as_deref(), Some(MSG_PARSE_FAILED));
}

#[tokio::test]
async fn non_json_error_page_is_an_application_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html><body>Bad Gateway</body></html>")
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    assert_eq!(session.state().error(), Some(MSG_PARSE_FAILED));
}

#[tokio::test]
async fn ok_status_with_error_body_withholds_result() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(200)
        .with_body(r#"{"status":"error","message":"Unable to detect credit card issuer"}"#)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    let view = render(&session);
    assert!(view.result.is_none());
    assert_eq!(
        view.error.as_deref(),
        Some("Unable to detect credit card issuer")
    );
}

// ── Connectivity ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn unreachable_service_shows_connectivity_message() {
    // Port 1 on loopback: nothing listens there.
    let (mut session, transport) = session_for("http://127.0.0.1:1");
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    assert_eq!(render(&session).error.as_deref(), Some(MSG_CONNECTIVITY));
}

#[tokio::test]
async fn timeout_shows_connectivity_message() {
    // Accept the connection but never answer.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let config = ClientConfig::builder()
        .base_url(format!("http://{addr}"))
        .request_timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let transport = HttpTransport::new(&config).unwrap();
    let mut session = Session::new(config);
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();

    assert_eq!(session.state().error(), Some(MSG_CONNECTIVITY));
    server.abort();
}

// ── Validation (no network) ──────────────────────────────────────────────────

#[tokio::test]
async fn submit_without_file_never_calls_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/parse")
        .expect(0)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.submit(&transport).await.unwrap();
    mock.assert_async().await;

    assert_eq!(render(&session).error.as_deref(), Some(MSG_NO_FILE));
}

#[tokio::test]
async fn non_pdf_selection_never_calls_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/parse")
        .expect(0)
        .create_async()
        .await;

    let (mut session, _transport) = session_for(&server.url());
    for (name, ty) in [("a.txt", "text/plain"), ("b.png", "image/png"), ("c", "")] {
        session.select(FileRef::new(name, ty, vec![1, 2, 3])).unwrap();
        assert!(session.candidate().is_none());
        assert!(session.state().result().is_none());
        assert_eq!(render(&session).error.as_deref(), Some(MSG_NOT_A_PDF));
        assert!(render(&session).submit.is_none());
    }
    mock.assert_async().await;
}

// ── Reset ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_after_success_restores_initial_view() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/parse")
        .with_status(200)
        .with_body(HDFC_SUCCESS)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();
    session.reset().unwrap();
    assert_initial(&session);
}

#[tokio::test]
async fn reset_after_failure_restores_initial_view() {
    let (mut session, transport) = session_for("http://127.0.0.1:1");
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();
    assert!(session.state().error().is_some());
    session.reset().unwrap();
    assert_initial(&session);
}

#[tokio::test]
async fn panels_are_mutually_exclusive_across_a_session() {
    let mut server = mockito::Server::new_async().await;
    let _ok = server
        .mock("POST", "/api/parse")
        .with_status(200)
        .with_body(HDFC_SUCCESS)
        .expect(1)
        .create_async()
        .await;

    let (mut session, transport) = session_for(&server.url());
    let check = |s: &Session| {
        let v = render(s);
        let panels = v.error.is_some() as u8 + v.result.is_some() as u8;
        match s.state() {
            SubmissionState::Idle | SubmissionState::Submitting => assert_eq!(panels, 0),
            _ => assert_eq!(panels, 1),
        }
    };

    check(&session);
    session.select(FileRef::new("x.doc", "application/msword", vec![])).unwrap();
    check(&session);
    session.select(statement()).unwrap();
    check(&session);
    session.begin_submit().unwrap();
    check(&session);
    session
        .complete(stmtparse::Outcome::Failed("Server error".into()))
        .unwrap();
    check(&session);
    session.reset().unwrap();
    session.select(statement()).unwrap();
    session.submit(&transport).await.unwrap();
    check(&session);
}
