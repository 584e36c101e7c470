use std::fmt;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OscillatorError {
    #[error("oscillator frequency must be nonzero")]
    ZeroFrequency,
}

/// Calls a tick function at a fixed rate, stretching or shrinking each
/// sleep so that the long-run rate stays on target.
pub struct Oscillator {
    cycles: u64,
    frequency_hz: u64,
}

impl fmt::Debug for Oscillator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oscillator: {}hz", self.frequency_hz)
    }
}

impl Oscillator {
    pub fn new(frequency_hz: u64) -> Result<Self, OscillatorError> {
        if frequency_hz == 0 {
            return Err(OscillatorError::ZeroFrequency);
        }
        Ok(Oscillator {
            cycles: 0,
            frequency_hz,
        })
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.frequency_hz)
    }

    /// Runs `tick` once per period, passing the cycle number (starting at 1),
    /// until it breaks.
    pub fn run<B, F>(&mut self, mut tick: F) -> B
    where
        F: FnMut(u64) -> ControlFlow<B>,
    {
        let period_duration = self.period();
        tracing::info!(
            period_ns = period_duration.as_nanos() as u64,
            "starting oscillator"
        );

        let start_time = Instant::now();
        let start_cycles = self.cycles;
        let mut period = period_duration;

        loop {
            std::thread::sleep(period);
            self.cycles += 1;
            if let ControlFlow::Break(result) = tick(self.cycles) {
                tracing::debug!(cycles = self.cycles, "oscillator stopped");
                return result;
            }

            let total_elapsed = start_time.elapsed();
            let expected_elapsed = period_duration.mul_f64((self.cycles - start_cycles) as f64);
            period = match expected_elapsed.checked_sub(total_elapsed) {
                Some(ahead) => period_duration + ahead,
                None => period_duration.saturating_sub(total_elapsed - expected_elapsed),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_frequency_is_rejected() {
        assert_eq!(Oscillator::new(0).unwrap_err(), OscillatorError::ZeroFrequency);
    }

    #[test]
    fn runs_until_break() {
        let mut osc = Oscillator::new(10_000).unwrap();
        assert_eq!(osc.period(), Duration::from_micros(100));
        let mut seen = Vec::new();
        let result = osc.run(|cycle| {
            seen.push(cycle);
            if cycle == 5 {
                ControlFlow::Break("done")
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(result, "done");
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(osc.cycles(), 5);
        assert_eq!(format!("{:?}", osc), "Oscillator: 10000hz");
    }
}
