// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Wall-clock timing: a stopwatch and a frame-rate counter.

use std::time::{Duration, Instant};

fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Measures the time elapsed since it was started or last reset.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch that starts running immediately.
    #[inline]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    /// Returns the elapsed time since the stopwatch was started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds, saturating at `u64::MAX`.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        whole_millis(self.elapsed())
    }

    /// Returns the elapsed time in seconds as f64.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Restarts the stopwatch from zero.
    #[inline]
    pub fn reset(&mut self) {
        self.start_time = Instant::now();
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Counts presented frames and reports frames per second over the last
/// completed measurement window.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window: Duration,
    stopwatch: Stopwatch,
    frames: u32,
    rate: f32,
}

impl FrameRate {
    /// A counter averaging over one-second windows.
    pub fn new() -> Self {
        Self::with_window(Duration::from_secs(1))
    }

    /// A counter averaging over windows of the given length.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            stopwatch: Stopwatch::new(),
            frames: 0,
            rate: 0.0,
        }
    }

    /// Records one presented frame. Closes the current window once it is long enough.
    pub fn tally(&mut self) {
        self.frames += 1;
        let elapsed = self.stopwatch.elapsed();
        if elapsed >= self.window {
            self.rate = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.stopwatch.reset();
        }
    }

    /// Frames per second of the last completed window, `0.0` before the first one closes.
    pub fn get(&self) -> f32 {
        self.rate
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SLEEP_DURATION_MS: u64 = 30;
    const SLEEP_MARGIN_MS: u64 = 500;

    #[test]
    fn millisecond_conversion_saturates() {
        assert_eq!(whole_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(whole_millis(Duration::from_micros(999)), 0);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn stopwatch_elapsed_time_after_delay() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));

        let elapsed_ms = watch.elapsed_ms();
        assert!(
            elapsed_ms >= SLEEP_DURATION_MS,
            "Elapsed ms ({elapsed_ms}) should be >= sleep duration ms ({SLEEP_DURATION_MS})"
        );
        assert!(elapsed_ms < SLEEP_DURATION_MS + SLEEP_MARGIN_MS);
    }

    #[test]
    fn stopwatch_reset_restarts() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        watch.reset();
        assert!(watch.elapsed_ms() < SLEEP_DURATION_MS);
    }

    #[test]
    fn frame_rate_is_zero_until_a_window_closes() {
        let mut fps = FrameRate::new();
        fps.tally();
        fps.tally();
        assert_eq!(fps.get(), 0.0);
    }

    #[test]
    fn frame_rate_reports_after_window() {
        let mut fps = FrameRate::with_window(Duration::from_millis(SLEEP_DURATION_MS));
        fps.tally();
        thread::sleep(Duration::from_millis(SLEEP_DURATION_MS));
        fps.tally();
        let rate = fps.get();
        assert!(rate > 0.0, "rate should be positive, got {rate}");
        // Two frames over at least 30ms.
        assert!(rate <= 2.0 / 0.030 + 1.0);
    }
}
