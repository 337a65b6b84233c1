use criterion::{BatchSize, Criterion, Throughput};
use liboctoprint::network::application::http::request::{self, RequestBuffer};
use liboctoprint::network::application::http::{
    Client, Config, Framer, Outcome, Request, extract_status_code,
};
use liboctoprint::network::error::Error;
use liboctoprint::network::{Close, Connect, Connection, Read, Write};
use liboctoprint::system::clock::Clock;
use std::cell::Cell;
use std::hint::black_box;

const JOB_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
Content-Length: 93\r\n\
Cache-Control: no-cache\r\n\
\r\n\
{\"job\":{\"file\":{\"name\":\"benchy.gcode\"}},\"progress\":{\"completion\":42.5},\"state\":\"Printing\"}   ";

/// Replays a canned response; writes are discarded.
struct Replay {
    data: &'static [u8],
    pos: usize,
}

impl Read for Replay {
    type Error = Error;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl Write for Replay {
    type Error = Error;
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for Replay {
    type Error = Error;
    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for Replay {}

struct ReplayConnector;

impl Connect for ReplayConnector {
    type Connection = Replay;
    type Error = Error;
    fn connect(&mut self, _remote: &str) -> Result<Replay, Error> {
        Ok(Replay {
            data: JOB_RESPONSE,
            pos: 0,
        })
    }
}

struct Counter(Cell<u64>);

impl Clock for Counter {
    fn now_ms(&self) -> u64 {
        let now = self.0.get();
        self.0.set(now + 1);
        now
    }
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let body = br#"{"command":"target","targets":{"tool0":210}}"#;
    let mut out = RequestBuffer::new();

    group.bench_function("get", |b| {
        b.iter(|| {
            request::encode(
                black_box(&Request::get("/api/printer/bed?history=true&limit=2")),
                "192.168.1.20",
                "0123456789ABCDEF0123456789ABCDEF",
                &mut out,
            )
            .unwrap();
            black_box(out.len())
        })
    });
    group.bench_function("post", |b| {
        b.iter(|| {
            request::encode(
                black_box(&Request::post("/api/printer/tool", body)),
                "192.168.1.20",
                "0123456789ABCDEF0123456789ABCDEF",
                &mut out,
            )
            .unwrap();
            black_box(out.len())
        })
    });
    group.finish();
}

pub fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    group.throughput(Throughput::Bytes(JOB_RESPONSE.len() as u64));

    group.bench_function("whole", |b| {
        b.iter(|| {
            let mut framer = Framer::new();
            framer.feed(black_box(JOB_RESPONSE));
            framer.finish(Outcome::Complete)
        })
    });
    group.bench_function("bytewise", |b| {
        b.iter(|| {
            let mut framer = Framer::new();
            for &byte in black_box(JOB_RESPONSE) {
                framer.push(byte);
            }
            framer.finish(Outcome::Complete)
        })
    });
    group.finish();
}

pub fn bench_status(c: &mut Criterion) {
    c.bench_function("extract_status_code", |b| {
        b.iter(|| {
            extract_status_code(black_box("HTTP/1.1 200 OK"))
                + extract_status_code(black_box("HTTP/1.1 409 Conflict"))
                + extract_status_code(black_box("garbage"))
        })
    });
}

pub fn bench_exchange(c: &mut Criterion) {
    let config = Config::with_ip([192, 168, 1, 20], 80, "API_KEY").unwrap();
    c.bench_function("exchange", |b| {
        b.iter_batched(
            || Client::new(ReplayConnector, Counter(Cell::new(0)), config.clone()),
            |mut client| {
                let response = client.get("/api/job").unwrap();
                assert_eq!(response.status_code, 200);
                response
            },
            BatchSize::SmallInput,
        )
    });
}
