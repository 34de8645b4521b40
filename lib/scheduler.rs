use crate::config::{Config, Suspension};
use crate::display::{Display, Readout};
use crate::error::{Error, Result, SampleError};
use crate::hw::{Clock, Instant, Screen, Sensor, Transfer};
use crate::sampler::Sampler;

/// Last good temperature and how the cycles since then went.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LastReading {
    value: Option<(f32, Instant)>,
    failures: u8,
}

impl LastReading {
    pub const fn new() -> Self {
        LastReading {
            value: None,
            failures: 0,
        }
    }

    /// Stores a successful cycle wholesale, or counts a failed one and keeps
    /// the previous value.
    pub fn record(&mut self, result: core::result::Result<f32, SampleError>, at: Instant) {
        match result {
            Ok(celsius) => {
                self.value = Some((celsius, at));
                self.failures = 0;
            }
            Err(_) => self.failures = self.failures.saturating_add(1),
        }
    }

    pub fn celsius(&self) -> Option<f32> {
        self.value.map(|(celsius, _)| celsius)
    }

    pub fn taken_at(&self) -> Option<Instant> {
        self.value.map(|(_, at)| at)
    }

    /// Consecutive failed cycles.
    pub fn failures(&self) -> u8 {
        self.failures
    }

    pub fn readout(&self, failure_threshold: u8) -> Readout {
        match self.value {
            Some((celsius, _)) if self.failures < failure_threshold => Readout::Celsius(celsius),
            _ => Readout::Unavailable,
        }
    }
}

/// What happened during one pass of the control loop.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Turn {
    /// A cycle was armed and left in flight
    pub began: bool,
    /// A cycle finished, successfully or not
    pub finished: Option<core::result::Result<f32, SampleError>>,
    /// Frame that was rendered
    pub frame: u32,
}

/// Main loop with two cadences: sampling every `sample_period`, rendering
/// on every turn with `render_period` of sleep in between.
///
/// The next sample is due one period after the previous cycle finished, so
/// time spent in a cycle is not compensated and a slow cycle pushes the
/// following ones back.
pub struct Scheduler {
    config: Config,
    next_sample: Instant,
    reading: LastReading,
}

impl Scheduler {
    pub fn new(config: Config, now: Instant) -> Self {
        Scheduler {
            config,
            next_sample: now + config.sample_period,
            reading: LastReading::new(),
        }
    }

    pub fn reading(&self) -> &LastReading {
        &self.reading
    }

    pub fn next_sample(&self) -> Instant {
        self.next_sample
    }

    /// Runs turns until the display fails.
    pub fn run<'a, S, T, SCREEN, C, const N: usize>(
        &mut self,
        sampler: &mut Sampler<'a, S, T, N>,
        display: &mut Display<SCREEN>,
        clock: &mut C,
    ) -> Error<SCREEN::Error>
    where
        S: Sensor,
        T: Transfer,
        SCREEN: Screen,
        C: Clock,
    {
        loop {
            if let Err(error) = self.turn(sampler, display, clock) {
                return error;
            }
            clock.sleep(self.config.render_period);
        }
    }

    pub fn turn<'a, S, T, SCREEN, C, const N: usize>(
        &mut self,
        sampler: &mut Sampler<'a, S, T, N>,
        display: &mut Display<SCREEN>,
        clock: &mut C,
    ) -> Result<Turn, SCREEN::Error>
    where
        S: Sensor,
        T: Transfer,
        SCREEN: Screen,
        C: Clock,
    {
        let mut turn = Turn::default();
        let now = clock.now();

        match self.config.suspension {
            Suspension::Blocking => {
                if now >= self.next_sample {
                    let result = sampler.acquire(&*clock);
                    turn.finished = Some(result);
                    self.complete(result, clock.now());
                }
            }
            Suspension::Interrupt => {
                if sampler.is_busy() {
                    if let Some(result) = sampler.poll(now) {
                        turn.finished = Some(result);
                        self.complete(result, now);
                    }
                } else if now >= self.next_sample {
                    match sampler.begin(now) {
                        Ok(()) => turn.began = true,
                        Err(error) => {
                            turn.finished = Some(Err(error));
                            self.complete(Err(error), now);
                        }
                    }
                }
            }
        }

        turn.frame = display.frame();
        display.render(self.reading.readout(self.config.failure_threshold))?;
        Ok(turn)
    }

    fn complete(&mut self, result: core::result::Result<f32, SampleError>, now: Instant) {
        self.reading.record(result, now);
        self.next_sample = now + self.config.sample_period;

        match result {
            Ok(celsius) => info!("temperature {=f32} C", celsius),
            Err(error) => {
                warn!("acquisition failed: {}", error);
                if self.reading.failures() == self.config.failure_threshold {
                    error!("{=u8} failed cycles in a row, readout blanked", self.reading.failures());
                }
            }
        }
    }
}
