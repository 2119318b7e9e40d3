#![allow(
    unfulfilled_lint_expectations,
    reason = "test lint expectations may not all trigger"
)]
#![expect(clippy::expect_used, reason = "test assertions")]
//! Session behaviour against an in-process fake runtime.

use std::time::{Duration, Instant};

use forte_client::{
    command::{Action, AttributeEscaping, ConfigError, Params},
    session::{RecvError, SendError, Session, SessionConfig},
};
use rstest::rstest;
use test_util::{FakeRuntime, Reply, closed_port, recording_session, test_config};

fn connected(runtime: &FakeRuntime) -> Session {
    let mut session = Session::new(test_config(runtime));
    session.connect().expect("connect");
    session
}

#[test]
fn consecutive_sends_use_increasing_ids() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let mut session = connected(&runtime);

    let first = session
        .send(&Action::Query, &Params::new())
        .expect("first send");
    let second = session
        .send(&Action::Start, &Params::new().with("name", "APP"))
        .expect("second send");

    assert_eq!(first.request_id(), 1);
    assert_eq!(first.text(), r#"<Response ID="1"/>"#);
    assert_eq!(second.request_id(), 2);
    assert_eq!(second.reply_id(), Some(2));
    assert_eq!(session.next_request_id(), 3);
    assert_eq!(
        runtime.requests(),
        [
            r#"<Request ID="1" Action="QUERY"><FB Name="" Type=""/></Request>"#,
            r#"<Request ID="2" Action="START"><Resource Name="APP"/></Request>"#,
        ]
    );
}

#[test]
fn send_without_connection_fails_without_io() {
    let (mut session, recorder) = recording_session(SessionConfig::default());

    let err = session
        .send(&Action::Query, &Params::new())
        .expect_err("send must fail");

    assert!(matches!(err, SendError::NotConnected));
    assert_eq!(session.next_request_id(), 1);
    assert!(recorder.events().is_empty());
}

#[test]
fn receive_without_connection_reports_not_connected() {
    let (mut session, recorder) = recording_session(SessionConfig::default());
    let err = session.receive().expect_err("receive must fail");
    assert!(matches!(err, RecvError::NotConnected));
    assert!(recorder.events().is_empty());
}

#[test]
fn closed_port_is_refused_within_timeout() {
    let port = closed_port().expect("port");
    let config = SessionConfig::new("127.0.0.1", port).with_timeout(Duration::from_secs(2));
    let (mut session, recorder) = recording_session(config);

    let started = Instant::now();
    let err = session.connect().expect_err("connect must fail");

    assert!(err.is_refused(), "unexpected error: {err}");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!session.is_connected());
    assert_eq!(
        recorder.events(),
        [
            format!("connecting to 127.0.0.1:{port}"),
            format!("connect failed: connection refused by 127.0.0.1:{port}"),
        ]
    );
}

#[test]
fn connect_twice_keeps_one_connection() {
    let runtime = FakeRuntime::serve(2, Vec::<Reply>::new()).expect("runtime");
    let (mut session, recorder) = recording_session(test_config(&runtime));

    session.connect().expect("first connect");
    session.connect().expect("second connect");
    session
        .send(&Action::Query, &Params::new())
        .expect("send");

    assert_eq!(runtime.connections(), 1);
    let connects = recorder
        .events()
        .iter()
        .filter(|event| event.starts_with("connected to"))
        .count();
    assert_eq!(connects, 1);
}

#[test]
fn silent_runtime_times_out_and_disconnects() {
    let runtime = FakeRuntime::start([Reply::Silent]).expect("runtime");
    let mut session = connected(&runtime);

    let started = Instant::now();
    let err = session
        .send(&Action::Query, &Params::new())
        .expect_err("send must time out");

    assert!(err.is_timeout(), "unexpected error: {err}");
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(!session.is_connected());
    assert!(matches!(
        session.send(&Action::Query, &Params::new()),
        Err(SendError::NotConnected)
    ));
}

#[rstest]
#[case::close_before_header(Reply::Close)]
#[case::partial_header(Reply::Partial(vec![5, 0]))]
#[case::partial_payload(Reply::truncated(10, 3).expect("reply"))]
fn early_close_is_reported_as_truncated(#[case] reply: Reply) {
    let runtime = FakeRuntime::start([reply]).expect("runtime");
    let mut session = connected(&runtime);

    let err = session
        .send(&Action::Query, &Params::new())
        .expect_err("send must fail");

    assert!(
        matches!(err, SendError::Recv(RecvError::Truncated)),
        "unexpected error: {err}"
    );
    assert!(!session.is_connected());
}

#[test]
fn oversized_response_is_rejected() {
    let text = r#"<Response ID="1" Reason="UNSUPPORTED_CMD"/>"#;
    let runtime = FakeRuntime::start([Reply::Text(text.to_owned())]).expect("runtime");
    let config = test_config(&runtime).with_max_response_bytes(Some(8));
    let mut session = Session::new(config);
    session.connect().expect("connect");

    let err = session
        .send(&Action::Query, &Params::new())
        .expect_err("send must fail");

    assert!(
        matches!(err, SendError::Recv(RecvError::TooLarge { max: 8, .. })),
        "unexpected error: {err}"
    );
}

#[test]
fn runtime_reason_is_exposed_on_response() {
    let text = r#"<Response ID="1" Reason="INVALID_OBJECT"/>"#;
    let runtime = FakeRuntime::start([Reply::Text(text.to_owned())]).expect("runtime");
    let mut session = connected(&runtime);

    let response = session
        .send(&Action::Start, &Params::new().with("name", "NOPE"))
        .expect("send");

    assert_eq!(response.reason(), Some("INVALID_OBJECT"));
    assert!(session.is_connected());
}

#[test]
fn missing_parameter_consumes_no_id() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let mut session = connected(&runtime);

    let err = session
        .send(&Action::CreateFb, &Params::new().with("name", "T1"))
        .expect_err("send must fail");

    assert!(matches!(
        err,
        SendError::Config(ConfigError::MissingParam(ref name)) if name == "type"
    ));
    assert_eq!(session.next_request_id(), 1);
    assert!(session.is_connected());
    let response = session
        .send(&Action::Query, &Params::new())
        .expect("send");
    assert_eq!(response.request_id(), 1);
}

#[test]
fn preview_matches_next_send_without_consuming_id() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let mut session = connected(&runtime);
    let params = Params::new().with("name", "APP");

    let preview = session.preview(&Action::Stop, &params).expect("preview");
    assert_eq!(session.next_request_id(), 1);
    session.send(&Action::Stop, &params).expect("send");

    assert_eq!(runtime.requests(), [preview]);
}

#[test]
fn raw_document_is_sent_verbatim() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let mut session = connected(&runtime);
    let document = r#"<Request ID="41" Action="QUERY"><FB Name="*" Type="*"/></Request>"#;

    let response = session.send_raw(document).expect("send");

    assert_eq!(response.request_id(), 1);
    assert_eq!(response.reply_id(), Some(41));
    assert_eq!(session.next_request_id(), 2);
    assert_eq!(runtime.requests(), [document]);
}

#[test]
fn escaping_applies_to_sent_attributes() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let config = test_config(&runtime).with_escaping(AttributeEscaping::Escape);
    let mut session = Session::new(config);
    session.connect().expect("connect");

    session
        .send(&Action::Start, &Params::new().with("name", "A&B"))
        .expect("send");

    assert_eq!(
        runtime.requests(),
        [r#"<Request ID="1" Action="START"><Resource Name="A&amp;B"/></Request>"#]
    );
}

#[test]
fn receive_times_out_when_nothing_is_pending() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let (mut session, recorder) = recording_session(test_config(&runtime));
    session.connect().expect("connect");

    let err = session.receive().expect_err("receive must fail");

    assert!(matches!(err, RecvError::Timeout));
    assert!(!session.is_connected());
    let events = recorder.events();
    assert!(events.iter().any(|event| event.starts_with("receive failed")));
    assert!(
        events
            .last()
            .is_some_and(|event| event.starts_with("disconnected from"))
    );
}

#[test]
fn disconnect_is_idempotent() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let (mut session, recorder) = recording_session(test_config(&runtime));
    session.connect().expect("connect");

    session.disconnect();
    session.disconnect();

    assert!(!session.is_connected());
    let disconnects = recorder
        .events()
        .iter()
        .filter(|event| event.starts_with("disconnected from"))
        .count();
    assert_eq!(disconnects, 1);
}

#[test]
fn request_ids_continue_across_reconnects() {
    let runtime = FakeRuntime::serve(2, [Reply::Close]).expect("runtime");
    let mut session = connected(&runtime);

    session
        .send(&Action::Query, &Params::new())
        .expect_err("first exchange must fail");
    assert!(!session.is_connected());

    session.connect().expect("reconnect");
    let response = session
        .send(&Action::Query, &Params::new())
        .expect("send after reconnect");

    assert_eq!(response.request_id(), 2);
    assert_eq!(runtime.connections(), 2);
    assert_eq!(
        runtime.requests(),
        [
            r#"<Request ID="1" Action="QUERY"><FB Name="" Type=""/></Request>"#,
            r#"<Request ID="2" Action="QUERY"><FB Name="" Type=""/></Request>"#,
        ]
    );
}

#[test]
fn exchange_events_are_reported_in_order() {
    let runtime = FakeRuntime::acking().expect("runtime");
    let (mut session, recorder) = recording_session(test_config(&runtime));
    let endpoint = session.endpoint().to_string();

    session.connect().expect("connect");
    session
        .send(&Action::Query, &Params::new())
        .expect("send");
    session.disconnect();

    assert_eq!(
        recorder.events(),
        [
            format!("connecting to {endpoint}"),
            format!("connected to {endpoint}"),
            "sent request 1 (QUERY, 62 bytes)".to_owned(),
            r#"received response to 1: <Response ID="1"/>"#.to_owned(),
            format!("disconnected from {endpoint}"),
        ]
    );
}
