#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

#[cfg(feature = "firmware")]
use defmt_rtt as _; // global logger
#[cfg(feature = "firmware")]
use panic_probe as _;

pub mod completion;
pub mod config;
pub mod convert;
pub mod display;
pub mod error;
pub mod hw;
pub mod sampler;
pub mod scheduler;

#[cfg(feature = "firmware")]
defmt::timestamp!("{=u32}", hw::millis());

/// Terminates the application and makes `probe-run` exit with exit-code = 0
#[cfg(feature = "firmware")]
pub fn exit() -> ! {
    loop {
        cortex_m::asm::bkpt();
    }
}
