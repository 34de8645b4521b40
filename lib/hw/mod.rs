use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::Drawable;

#[cfg(feature = "firmware")]
mod adc;
#[cfg(feature = "firmware")]
mod helper;
#[cfg(feature = "firmware")]
mod oled;
#[cfg(feature = "firmware")]
mod timers;

#[cfg(feature = "firmware")]
pub use adc::{SensorTransfer, TempSensor, TransferIrq};
#[cfg(feature = "firmware")]
pub use helper::*;
#[cfg(feature = "firmware")]
pub use oled::Oled;
#[cfg(feature = "firmware")]
pub use timers::{millis, SysClock, TickTimer};

/// Monotonic millisecond instant, wraps after ~49 days.
pub type Instant = fugit::TimerInstantU32<1_000>;
pub type Duration = fugit::MillisDurationU32;

/// Analog front end feeding the transfer.
pub trait Sensor {
    fn enable(&mut self, enabled: bool);
    /// True while conversions are running.
    fn is_running(&self) -> bool;
    fn select_channel(&mut self, channel: u8);
    fn configure_result_queue(&mut self, queue: ResultQueue);
    /// Throws away results left over from a previous run.
    fn drain_queue(&mut self);
    /// Address of the result register the transfer reads from.
    fn data_address(&self) -> u32;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResultQueue {
    /// Raise a transfer request for every result.
    pub dma_requests: bool,
    /// Overwrite an unread result instead of keeping it.
    pub overwrite: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WordSize {
    Bits8,
    Bits16,
    Bits32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TransferConfig {
    pub width: WordSize,
    pub source: u32,
    pub source_increment: bool,
    pub destination_increment: bool,
    pub count: u16,
}

/// Peripheral to memory transfer channel.
///
/// The destination buffer is handed over in `configure` and only comes back
/// through `release`, software cannot touch it while the channel owns it.
pub trait Transfer {
    fn configure(&mut self, config: &TransferConfig, destination: &'static mut [u16]);
    fn start(&mut self);
    /// Hardware transfer-complete status, polled by the blocking strategy.
    fn is_complete(&self) -> bool;
    /// Clears the transfer-complete pending bit.
    fn acknowledge(&mut self);
    /// Stops the channel and returns the destination buffer.
    fn release(&mut self) -> Option<&'static mut [u16]>;
}

pub trait Screen {
    type Error;
    fn clear(&mut self) -> Result<(), Self::Error>;
    fn draw<D: Drawable<Color = BinaryColor>>(&mut self, drawable: &D)
        -> Result<D::Output, Self::Error>;
    /// Pushes the frame buffer to the panel.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&mut self, duration: Duration);
}
