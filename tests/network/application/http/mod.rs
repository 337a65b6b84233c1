use crate::network::{MockConnector, Step, TickClock};
use liboctoprint::network::application::http::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[cfg(feature = "async")]
mod nonblocking;

const OK_HELLO: &str = "HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";

fn config() -> Config {
    Config::with_ip([192, 168, 1, 20], 80, "ABC123")
        .unwrap()
        .timeout_ms(3000)
}

fn client(connector: MockConnector) -> Client<MockConnector, TickClock> {
    Client::new(connector, TickClock::new(1), config())
}

#[test]
fn get_reads_length_delimited_body() {
    let connector = MockConnector::new().respond(OK_HELLO);
    let log = connector.log.clone();
    let mut client = client(connector);

    let response = client.get("/api/version").unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.status_line.as_str(), "HTTP/1.1 200 OK");
    assert_eq!(response.body.as_slice(), b"hello");
    assert_eq!(response.outcome, Outcome::Complete);
    assert!(!response.is_truncated());

    let log = log.borrow();
    assert_eq!(log.connects, ["192.168.1.20:80"]);
    assert_eq!(log.closes, 1);
}

#[test]
fn get_request_is_encoded_exactly() {
    let connector = MockConnector::new().respond(OK_HELLO);
    let log = connector.log.clone();
    let mut client = client(connector);

    client.get("/api/job").unwrap();

    let expected = format!(
        "GET /api/job HTTP/1.1\r\n\
         Host: 192.168.1.20\r\n\
         X-Api-Key: ABC123\r\n\
         User-Agent: {USER_AGENT}\r\n\
         Connection: keep-alive\r\n\
         \r\n"
    );
    assert_eq!(log.borrow().request(0), expected);
}

#[test]
fn post_carries_json_body() {
    let connector = MockConnector::new().respond("HTTP/1.1 204 No Content\r\n\r\n");
    let log = connector.log.clone();
    let mut client = client(connector);
    let body = br#"{"command": "start"}"#;

    let response = client.post("/api/job", body).unwrap();
    assert_eq!(response.status_code, 204);

    let request = log.borrow().request(0);
    assert!(request.starts_with("POST /api/job HTTP/1.1\r\n"));
    assert!(request.contains("Content-Type: application/json\r\n"));
    assert!(request.contains(&format!("Content-Length: {}\r\n", body.len())));
    assert!(request.ends_with("\r\n\r\n{\"command\": \"start\"}\r\n"));
    assert_eq!(request.matches("Host: ").count(), 1);
    assert_eq!(request.matches("X-Api-Key: ").count(), 1);
}

#[test]
fn identical_gets_encode_identically() {
    let connector = MockConnector::new().respond(OK_HELLO).respond(OK_HELLO);
    let log = connector.log.clone();
    let mut client = client(connector);

    client.get("/api/printer").unwrap();
    client.get("/api/printer").unwrap();

    let log = log.borrow();
    assert_eq!(log.written[0], log.written[1]);
    assert_eq!(log.closes, 2);
}

#[test]
fn unsupported_method_fails_before_connecting() {
    let connector = MockConnector::new();
    let log = connector.log.clone();
    let mut client = client(connector);

    for method in [Method::Put, Method::Delete, Method::Patch, Method::Head, Method::Options] {
        let request = Request {
            method,
            path: "/api/job",
            body: None,
        };
        assert_eq!(client.request(&request), Err(Error::UnsupportedMethod));
    }
    assert!(log.borrow().connects.is_empty());
}

#[test]
fn invalid_path_fails_before_connecting() {
    let connector = MockConnector::new();
    let log = connector.log.clone();
    let mut client = client(connector);

    assert_eq!(client.get(""), Err(Error::InvalidPath));
    assert_eq!(
        client.get("/api/job HTTP/1.1\r\nX-Evil: 1"),
        Err(Error::InvalidPath)
    );
    assert!(log.borrow().connects.is_empty());
}

#[test]
fn oversized_request_is_rejected() {
    let mut client = client(MockConnector::new());
    let body = vec![b'x'; MAX_REQUEST_LEN];
    assert_eq!(client.post("/api/job", &body), Err(Error::RequestTooLarge));
}

#[test]
fn truncated_body_returns_partial_data_on_disconnect() {
    let connector = MockConnector::new().script(vec![
        Step::Data(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabcd".to_vec()),
        Step::Drop,
    ]);
    let log = connector.log.clone();
    let mut client = client(connector);

    let response = client.get("/api/job").unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_slice(), b"abcd");
    assert_eq!(response.outcome, Outcome::Disconnected);
    assert!(response.is_truncated());
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn truncated_body_returns_partial_data_on_timeout() {
    let connector = MockConnector::new()
        .respond("HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nabcd");
    let mut client = client(connector);

    let response = client.get("/api/job").unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_slice(), b"abcd");
    assert_eq!(response.outcome, Outcome::Timeout);
    assert_eq!(response.body_received, 4);
}

#[test]
fn silent_peer_times_out_with_sentinel() {
    let connector = MockConnector::new().script(vec![Step::Idle]);
    let log = connector.log.clone();
    let mut client = Client::new(connector, TickClock::new(7), config().timeout_ms(500));

    let response = client.get("/api/printer").unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert!(response.body.is_empty());
    assert_eq!(response.outcome, Outcome::Timeout);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn timeout_survives_clock_wrap() {
    let connector = MockConnector::new();
    let mut client = Client::new(connector, TickClock::near_wrap(3), config().timeout_ms(100));

    let response = client.get("/api/printer").unwrap();
    assert_eq!(response.outcome, Outcome::Timeout);
}

#[test]
fn headers_incomplete_at_disconnect_gives_sentinel() {
    let connector = MockConnector::new().script(vec![
        Step::Data(b"HTTP/1.1 200 OK\r\nContent-Len".to_vec()),
        Step::Drop,
    ]);
    let mut client = client(connector);

    let response = client.get("/api/printer").unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert!(response.body.is_empty());
    assert_eq!(response.outcome, Outcome::Disconnected);
}

#[test]
fn refused_connection_gives_sentinel() {
    let mut connector = MockConnector::new();
    connector.refuse = true;
    let log = connector.log.clone();
    let mut client = client(connector);

    let response = client.get("/api/printer").unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert_eq!(response.outcome, Outcome::ConnectionFailed);
    assert_eq!(log.borrow().connects.len(), 1);
    assert_eq!(log.borrow().closes, 0);
}

#[test]
fn failed_write_closes_and_gives_sentinel() {
    let mut connector = MockConnector::new().respond(OK_HELLO);
    connector.fail_writes = true;
    let log = connector.log.clone();
    let mut client = client(connector);

    let response = client.get("/api/printer").unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert_eq!(response.outcome, Outcome::WriteFailed);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn status_codes_pass_through() {
    for (raw, code) in [
        ("HTTP/1.1 204 No Content\r\n\r\n", 204),
        ("HTTP/1.1 409 Conflict\r\nContent-Length: 0\r\n\r\n", 409),
        ("HTTP/1.1 404\r\nContent-Length: 0\r\n\r\n", 404),
        ("HTTP/1.1\r\nContent-Length: 0\r\n\r\n", SENTINEL_STATUS),
        ("HTTP/1.1 OK\r\nContent-Length: 0\r\n\r\n", SENTINEL_STATUS),
    ] {
        let mut client = client(MockConnector::new().respond(raw));
        let response = client.get("/api/job").unwrap();
        assert_eq!(response.status_code, code, "{raw:?}");
    }
}

#[test]
fn response_without_length_reads_until_idle_timeout() {
    let connector = MockConnector::new()
        .respond("HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nPrinter is not operational");
    let mut client = client(connector);

    let response = client.get("/api/printer").unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body_str(), Some("Printer is not operational"));
    assert_eq!(response.content_length, None);
    assert_eq!(response.outcome, Outcome::Timeout);
    assert_eq!(response.header("content-type"), Some("text/plain"));
}

#[test]
fn bytes_after_the_body_are_not_read() {
    let connector = MockConnector::new().script(vec![
        Step::Data(OK_HELLO.as_bytes().to_vec()),
        Step::Data(b"HTTP/1.1 200 OK\r\n".to_vec()),
    ]);
    let mut client = client(connector);

    let response = client.get("/api/job").unwrap();
    assert_eq!(response.body.as_slice(), b"hello");
    assert_eq!(response.outcome, Outcome::Complete);
}

#[test]
fn body_larger_than_buffer_is_counted_but_capped() {
    let body = "x".repeat(MAX_BODY_LEN + 100);
    let raw = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}", body.len());
    let mut client = client(MockConnector::new().respond(&raw));

    let response = client.get("/api/files").unwrap();

    assert_eq!(response.body.len(), MAX_BODY_LEN);
    assert_eq!(response.body_received, MAX_BODY_LEN + 100);
    assert!(response.is_overflowed());
    assert!(!response.is_truncated());
    assert_eq!(response.outcome, Outcome::Complete);
}

#[test]
fn random_chunking_yields_the_same_response() {
    let body = r#"{"api":"0.1","server":"1.9"}"#;
    let raw = format!(
        "HTTP/1.1 200 OK\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         \r\n\
         {body}",
        body.len()
    );
    let mut rng = StdRng::seed_from_u64(0x0c70);

    for _ in 0..50 {
        let mut steps = Vec::new();
        let mut rest = raw.as_bytes();
        while !rest.is_empty() {
            let n = rng.gen_range(1..=rest.len().min(12));
            steps.push(Step::Data(rest[..n].to_vec()));
            if rng.gen_bool(0.3) {
                steps.push(Step::Idle);
            }
            rest = &rest[n..];
        }
        let mut client = client(MockConnector::new().script(steps));

        let response = client.get("/api/version").unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body_str(), Some(body));
        assert_eq!(response.outcome, Outcome::Complete);
        assert_eq!(response.headers.len(), 2);
    }
}

#[test]
fn hostname_target_is_used_for_connect_and_host_header() {
    let connector = MockConnector::new().respond(OK_HELLO);
    let log = connector.log.clone();
    let config = Config::with_hostname("octopi.local", 5000, "KEY").unwrap();
    let mut client = Client::new(connector, TickClock::new(1), config);

    client.get("/api/version").unwrap();

    let log = log.borrow();
    assert_eq!(log.connects, ["octopi.local:5000"]);
    assert!(log.request(0).contains("Host: octopi.local\r\n"));
}
