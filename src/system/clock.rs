/// A free-running millisecond counter.
///
/// Implement this over whatever timer the target has (`millis()`, a SysTick
/// counter, `embassy_time::Instant`, ...). Only differences between two
/// readings are used, computed with wrapping arithmetic, so the origin is
/// irrelevant and a counter that wraps is fine as long as no single wait
/// spans a full wrap.
pub trait Clock {
    /// Milliseconds since an arbitrary origin.
    fn now_ms(&self) -> u64;

    /// Milliseconds elapsed since `since`, a previous [`now_ms`](Clock::now_ms).
    fn elapsed_ms(&self, since: u64) -> u64 {
        self.now_ms().wrapping_sub(since)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Clock backed by `std::time::Instant`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// A clock whose origin is now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}
