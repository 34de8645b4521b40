use crate::completion::Waiter;
use crate::config::{Config, Suspension};
use crate::convert::Calibration;
use crate::error::SampleError;
use crate::hw::{Clock, Duration, Instant, ResultQueue, Sensor, Transfer, TransferConfig, WordSize};

pub type Buffer<const N: usize> = [u16; N];

/// Acquisition engine: one transfer of `N` raw codes per cycle, reduced to
/// a single temperature.
///
/// The buffer is moved into the transfer when a cycle is armed and taken
/// back once completion has been observed, so at most one cycle is ever in
/// flight and the codes are never read early.
pub struct Sampler<'a, S, T, const N: usize> {
    sensor: S,
    transfer: T,
    completion: Waiter<'a>,
    buffer: Option<&'static mut [u16]>,
    calibration: Calibration,
    suspension: Suspension,
    timeout: Duration,
    started: Option<Instant>,
}

impl<'a, S, T, const N: usize> Sampler<'a, S, T, N>
where
    S: Sensor,
    T: Transfer,
{
    pub fn new(
        mut sensor: S,
        transfer: T,
        buffer: &'static mut Buffer<N>,
        completion: Waiter<'a>,
        calibration: Calibration,
        config: &Config,
    ) -> Self {
        sensor.select_channel(config.channel);
        sensor.configure_result_queue(ResultQueue {
            dma_requests: true,
            overwrite: true,
        });
        Sampler {
            sensor,
            transfer,
            completion,
            buffer: Some(buffer),
            calibration,
            suspension: config.suspension,
            timeout: config.acquire_timeout,
            started: None,
        }
    }

    /// Runs a whole cycle, returning once it completed or timed out.
    pub fn acquire<C: Clock>(&mut self, clock: &C) -> Result<f32, SampleError> {
        self.begin(clock.now())?;
        loop {
            if let Some(result) = self.poll(clock.now()) {
                return result;
            }
        }
    }

    /// Arms and starts a cycle without waiting for it.
    pub fn begin(&mut self, now: Instant) -> Result<(), SampleError> {
        if self.started.is_some() || self.sensor.is_running() {
            return Err(SampleError::HardwareBusy);
        }
        let buffer = self.buffer.take().ok_or(SampleError::HardwareBusy)?;

        // Stale completion must be gone before the channel can post a new one
        self.completion.reset();
        let config = TransferConfig {
            width: WordSize::Bits16,
            source: self.sensor.data_address(),
            source_increment: false,
            destination_increment: true,
            count: N as u16,
        };
        self.transfer.configure(&config, buffer);
        self.sensor.drain_queue();
        self.sensor.enable(true);
        self.transfer.start();
        self.started = Some(now);
        Ok(())
    }

    /// Checks the cycle in flight.
    ///
    /// `None` while the transfer is pending (or when nothing was started),
    /// otherwise the outcome of the cycle.
    pub fn poll(&mut self, now: Instant) -> Option<Result<f32, SampleError>> {
        let started = self.started?;
        if self.completed() {
            return Some(self.finish());
        }
        let elapsed = now
            .checked_duration_since(started)
            .unwrap_or_else(|| Duration::from_ticks(0));
        if elapsed >= self.timeout {
            return Some(self.abort());
        }
        None
    }

    pub fn is_busy(&self) -> bool {
        self.started.is_some()
    }

    fn completed(&mut self) -> bool {
        match self.suspension {
            Suspension::Interrupt => self.completion.take(),
            Suspension::Blocking => {
                if self.transfer.is_complete() {
                    self.transfer.acknowledge();
                    true
                } else {
                    false
                }
            }
        }
    }

    fn finish(&mut self) -> Result<f32, SampleError> {
        self.sensor.enable(false);
        self.started = None;
        let buffer = self.transfer.release().ok_or(SampleError::HardwareBusy)?;
        debug!("cycle of {=usize} samples done", N);
        let result = self.calibration.average(buffer);
        self.buffer = Some(buffer);
        result
    }

    fn abort(&mut self) -> Result<f32, SampleError> {
        warn!("transfer did not complete, aborting cycle");
        self.sensor.enable(false);
        self.started = None;
        self.buffer = self.transfer.release();
        Err(SampleError::SensorTimeout)
    }
}
