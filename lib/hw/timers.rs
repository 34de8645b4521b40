use core::sync::atomic::{AtomicU32, Ordering};
use stm32g0xx_hal::hal::timer::CountDown;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::TIM6;
use stm32g0xx_hal::time::Hertz;
use stm32g0xx_hal::timer::{Timer, TimerExt};

use crate::hw::{Clock, Duration, Instant};

static MILLIS: AtomicU32 = AtomicU32::new(0);

/// Milliseconds since `TickTimer::start`.
pub fn millis() -> u32 {
    MILLIS.load(Ordering::Relaxed)
}

/// 1 kHz time base behind `SysClock`.
pub struct TickTimer {
    timer: Timer<TIM6>,
    freq: Hertz,
}

impl TickTimer {
    pub fn new(pac_tim: TIM6, freq: Hertz, rcc: &mut Rcc) -> Self {
        TickTimer {
            timer: pac_tim.timer(rcc),
            freq,
        }
    }

    pub fn start(&mut self) {
        self.timer.clear_irq();
        self.timer.listen();
        self.timer.start(self.freq);
    }

    pub fn unpend(&mut self) {
        self.timer.clear_irq();
    }

    pub fn tick(&mut self) {
        // NOTE(no-CAS) single writer, runs at the highest priority
        let n = MILLIS.load(Ordering::Relaxed);
        MILLIS.store(n.wrapping_add(1), Ordering::Relaxed);
    }
}

/// Monotonic clock fed by `TickTimer`.
pub struct SysClock;

impl Clock for SysClock {
    fn now(&self) -> Instant {
        Instant::from_ticks(millis())
    }

    fn sleep(&mut self, duration: Duration) {
        let until = self.now() + duration;
        while self.now() < until {
            cortex_m::asm::wfi();
        }
    }
}
