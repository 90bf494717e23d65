//! Ways to wait for the controller to become ready again
//!
//! The IL0373 pulls its busy output low while it is working. When that line
//! is wired, [`BusyPin`] polls it. Without it [`FixedDelay`] waits a constant
//! time that covers every operation the driver issues.

use embedded_hal::{delay::DelayNs, digital::InputPin};
use log::warn;

use crate::error::ErrorKind;
use crate::traits::WaitReady;

/// Fallback wait in ms when no busy line is wired
pub const DEFAULT_BUSY_WAIT_MS: u32 = 500;

/// Interval in ms between two samples of the busy line
const POLL_INTERVAL_MS: u32 = 1;

/// Polls the busy line until it reads high
///
/// There is no timeout: a panel that never releases the line blocks forever.
pub struct BusyPin<BUSY> {
    busy: BUSY,
}

impl<BUSY: InputPin> BusyPin<BUSY> {
    /// Wraps the busy input
    pub fn new(busy: BUSY) -> Self {
        BusyPin { busy }
    }

    /// Gives back the busy input
    pub fn release(self) -> BUSY {
        self.busy
    }
}

impl<BUSY: InputPin> WaitReady for BusyPin<BUSY> {
    fn wait_until_ready<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), ErrorKind> {
        while self.busy.is_low().map_err(ErrorKind::busy)? {
            delay.delay_ms(POLL_INTERVAL_MS);
        }
        Ok(())
    }
}

/// Polls the busy line like [`BusyPin`], but gives up after `timeout_ms`
///
/// Meant for bench setups and tests where a missing panel shouldn't hang.
pub struct BusyPinTimeout<BUSY> {
    busy: BUSY,
    timeout_ms: u32,
}

impl<BUSY: InputPin> BusyPinTimeout<BUSY> {
    /// Wraps the busy input, waiting at most `timeout_ms` per call
    pub fn new(busy: BUSY, timeout_ms: u32) -> Self {
        BusyPinTimeout { busy, timeout_ms }
    }

    /// Gives back the busy input
    pub fn release(self) -> BUSY {
        self.busy
    }
}

impl<BUSY: InputPin> WaitReady for BusyPinTimeout<BUSY> {
    fn wait_until_ready<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), ErrorKind> {
        let mut waited = 0;
        while self.busy.is_low().map_err(ErrorKind::busy)? {
            if waited >= self.timeout_ms {
                warn!("display still busy after {} ms", waited);
                return Err(ErrorKind::BusyTimeout);
            }
            delay.delay_ms(POLL_INTERVAL_MS);
            waited += POLL_INTERVAL_MS;
        }
        Ok(())
    }
}

/// Waits a constant time instead of reading a busy line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    ms: u32,
}

impl FixedDelay {
    /// Waits `ms` on every call
    pub fn new(ms: u32) -> Self {
        FixedDelay { ms }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        FixedDelay::new(DEFAULT_BUSY_WAIT_MS)
    }
}

impl WaitReady for FixedDelay {
    fn wait_until_ready<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), ErrorKind> {
        delay.delay_ms(self.ms);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    struct CountingDelay {
        ms: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.ms += ns / 1_000_000;
        }

        fn delay_ms(&mut self, ms: u32) {
            self.ms += ms;
        }
    }

    #[test]
    fn polls_until_high() {
        let busy = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::Low),
            PinTransaction::get(State::High),
        ]);
        let mut wait = BusyPin::new(busy);
        let mut delay = CountingDelay { ms: 0 };

        wait.wait_until_ready(&mut delay).unwrap();
        assert_eq!(delay.ms, 2);

        wait.release().done();
    }

    #[test]
    fn ready_pin_does_not_wait() {
        let busy = PinMock::new(&[PinTransaction::get(State::High)]);
        let mut wait = BusyPin::new(busy);

        wait.wait_until_ready(&mut NoopDelay::new()).unwrap();

        wait.release().done();
    }

    #[test]
    fn timeout_gives_up() {
        let busy = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::Low),
            PinTransaction::get(State::Low),
            PinTransaction::get(State::Low),
        ]);
        let mut wait = BusyPinTimeout::new(busy, 3);
        let mut delay = CountingDelay { ms: 0 };

        assert_eq!(
            wait.wait_until_ready(&mut delay),
            Err(ErrorKind::BusyTimeout)
        );
        assert_eq!(delay.ms, 3);

        wait.release().done();
    }

    #[test]
    fn timeout_passes_when_ready() {
        let busy = PinMock::new(&[
            PinTransaction::get(State::Low),
            PinTransaction::get(State::High),
        ]);
        let mut wait = BusyPinTimeout::new(busy, 100);

        wait.wait_until_ready(&mut NoopDelay::new()).unwrap();

        wait.release().done();
    }

    #[test]
    fn fixed_delay_waits_constant_time() {
        let mut delay = CountingDelay { ms: 0 };
        FixedDelay::default().wait_until_ready(&mut delay).unwrap();
        FixedDelay::new(20).wait_until_ready(&mut delay).unwrap();
        assert_eq!(delay.ms, 520);
    }
}
