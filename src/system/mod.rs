//! System utilities for embedded devices.
//!
//! # Available Utilities
//!
//! - **[`clock`]**: Millisecond time source used to bound network waits

/// Monotonic millisecond clocks.
///
/// The HTTP client never sleeps or blocks on a timer itself; it samples a
/// [`Clock`](clock::Clock) between reads to enforce its deadline.
pub mod clock;
