use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::client::bench_encode,
    network::application::http::client::bench_frame,
    network::application::http::client::bench_status,
    network::application::http::client::bench_exchange
);
criterion_main!(benches);
