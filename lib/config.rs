use crate::hw::Duration;

/// Samples averaged per acquisition cycle.
pub const SAMPLE_COUNT: usize = 100;

/// ADC input wired to the internal temperature sensor.
pub const TEMPERATURE_CHANNEL: u8 = 12;

/// How the engine waits for a transfer to finish.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Suspension {
    /// Poll the channel status until done. Rendering stops for the cycle.
    Blocking,
    /// The completion interrupt posts to the signal, the loop keeps
    /// rendering and polls the engine once per turn.
    Interrupt,
}

#[derive(Copy, Clone, Debug)]
pub struct Config {
    pub sample_period: Duration,
    pub render_period: Duration,
    pub acquire_timeout: Duration,
    /// Consecutive failed cycles before the readout is blanked.
    pub failure_threshold: u8,
    pub suspension: Suspension,
    pub channel: u8,
}

impl Config {
    pub fn with_suspension(self, suspension: Suspension) -> Self {
        Config { suspension, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sample_period: Duration::from_ticks(500),
            render_period: Duration::from_ticks(50),
            acquire_timeout: Duration::from_ticks(25),
            failure_threshold: 3,
            suspension: Suspension::Interrupt,
            channel: TEMPERATURE_CHANNEL,
        }
    }
}
