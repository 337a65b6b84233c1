use super::{OK_HELLO, client, config};
use crate::network::{MockConnector, Step, TickClock};
use futures::executor::block_on;
use liboctoprint::network::application::http::*;

#[test]
fn async_get_matches_blocking_client() {
    let connector = MockConnector::new().respond(OK_HELLO);
    let log = connector.log.clone();
    let mut client = AsyncClient::new(connector, TickClock::new(1), config());

    let response = block_on(client.get("/api/version")).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_slice(), b"hello");
    assert_eq!(response.outcome, Outcome::Complete);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn async_silent_peer_times_out() {
    let connector = MockConnector::new().script(vec![Step::Idle]);
    let mut client = AsyncClient::new(connector, TickClock::new(5), config().timeout_ms(200));

    let response = block_on(client.get("/api/printer")).unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert_eq!(response.outcome, Outcome::Timeout);
}

#[test]
fn async_post_rejects_unsupported_method() {
    let connector = MockConnector::new();
    let log = connector.log.clone();
    let mut client = AsyncClient::new(connector, TickClock::new(1), config());
    let request = Request {
        method: Method::Delete,
        path: "/api/files/local/a.gcode",
        body: None,
    };

    assert_eq!(block_on(client.request(&request)), Err(Error::UnsupportedMethod));
    assert!(log.borrow().connects.is_empty());
}

#[test]
fn async_disconnect_keeps_partial_body() {
    let connector = MockConnector::new().script(vec![
        Step::Data(b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nab".to_vec()),
        Step::Drop,
    ]);
    let mut client = AsyncClient::new(connector, TickClock::new(1), config());

    let response = block_on(client.post("/api/job", b"{}")).unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body.as_slice(), b"ab");
    assert_eq!(response.outcome, Outcome::Disconnected);
}

#[test]
fn async_and_blocking_clients_agree() {
    let scripts = || {
        vec![
            vec![
                Step::Data(b"HTTP/1.1 200 OK\r\nContent-Le".to_vec()),
                Step::Idle,
                Step::Data(b"ngth: 6\r\n\r\nabc".to_vec()),
                Step::Data(b"def".to_vec()),
            ],
            vec![Step::Data(b"HTTP/1.1 200 OK\r\n".to_vec()), Step::Idle],
            vec![
                Step::Data(b"HTTP/1.1 409 CONFLICT\r\nContent-Length: 9\r\n\r\nabcd".to_vec()),
                Step::Drop,
            ],
        ]
    };

    for (blocking_script, async_script) in scripts().into_iter().zip(scripts()) {
        let mut blocking = client(MockConnector::new().script(blocking_script));
        let mut nonblocking = AsyncClient::new(
            MockConnector::new().script(async_script),
            TickClock::new(1),
            config(),
        );

        let expected = blocking.get("/api/job").unwrap();
        let actual = block_on(nonblocking.get("/api/job")).unwrap();

        assert_eq!(actual, expected);
    }
}

#[test]
fn async_failed_write_closes_and_gives_sentinel() {
    let mut connector = MockConnector::new().respond(OK_HELLO);
    connector.fail_writes = true;
    let log = connector.log.clone();
    let mut client = AsyncClient::new(connector, TickClock::new(1), config());

    let response = block_on(client.get("/api/printer")).unwrap();

    assert_eq!(response.status_code, SENTINEL_STATUS);
    assert_eq!(response.outcome, Outcome::WriteFailed);
    assert_eq!(log.borrow().closes, 1);
}
