pub type Result<T, SCREEN> = core::result::Result<T, Error<SCREEN>>;

#[derive(Debug)]
pub enum Error<SCREEN> {
    // Display transport error
    Display(SCREEN),
    // Readout text did not fit
    BufferWrite,
}

/// Failure of a single acquisition cycle.
///
/// None of these halt the control loop, the cycle is skipped and the last
/// good reading stays on screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "firmware", derive(defmt::Format))]
pub enum SampleError {
    /// A cycle is already in flight or the sensor is still converting
    HardwareBusy,
    /// Transfer completion was not observed within the acquire timeout
    SensorTimeout,
    /// Raw code wider than the converter resolution
    ConversionOutOfRange(u16),
}
