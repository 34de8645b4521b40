use core::sync::atomic::{self, Ordering};
use stm32g0xx_hal::dma::{Channel as DmaChannel, Direction, Event, Priority, WordSize as DmaWordSize};
use stm32g0xx_hal::hal::blocking::delay::DelayUs;
use stm32g0xx_hal::rcc::Rcc;
use stm32g0xx_hal::stm32g0::stm32g070::{ADC, DMA, RCC};

use crate::hw::{ResultQueue, Sensor, Transfer, TransferConfig, WordSize};

/// ADC wired to the internal temperature sensor.
pub struct TempSensor {
    adc: ADC,
}

impl TempSensor {
    pub fn new<D: DelayUs<u8>>(pac_adc: ADC, rcc: &mut Rcc, delay: &mut D) -> Self {
        TempSensor::enable_clock_and_reset(rcc);
        let mut sensor = TempSensor { adc: pac_adc };
        sensor.disable();
        sensor.enable_vreg(delay);
        sensor.calibrate();
        sensor.enable();
        sensor.configure();
        sensor
    }

    fn configure(&mut self) {
        self.adc.cfgr1.write(|w| unsafe {
            // Software start
            w.exten().bits(0b00);
            // Back to back conversions until ADSTP
            w.cont().set_bit();
            // Right alignment
            w.align().clear_bit();
            // 12-bit resolution
            w.res().bits(0b00)
        });
        // Enable temperature sensor
        self.adc.ccr.write(|w| w.tsen().set_bit());
        // 160.5 cycles, the sensor needs the long sampling time
        self.adc.smpr.write(|w| unsafe { w.smp1().bits(0b111) });
    }

    fn enable_clock_and_reset(_: &mut Rcc) {
        let rcc = unsafe { &(*RCC::ptr()) };
        rcc.apbenr2.modify(|_, w| w.adcen().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().set_bit());
        rcc.apbrstr2.modify(|_, w| w.adcrst().clear_bit());
    }

    fn enable_vreg<D: DelayUs<u8>>(&mut self, delay: &mut D) {
        self.adc.cr.modify(|_, w| w.advregen().set_bit());
        // Max starting time declared by stm32g070 datasheet is 20 us
        delay.delay_us(20);
    }

    fn enable(&mut self) {
        self.adc.isr.write(|w| w.adrdy().set_bit());
        self.adc.cr.modify(|_, w| w.aden().set_bit());
        while self.adc.isr.read().adrdy().bit_is_clear() {}
    }

    fn disable(&mut self) {
        let cr = self.adc.cr.read();
        if cr.aden().bit_is_clear() {
            return;
        }
        if cr.adstart().bit_is_set() {
            self.adc.cr.modify(|_, w| w.adstp().set_bit());
        }
        self.adc.cr.modify(|_, w| w.addis().set_bit());
        while self.adc.cr.read().aden().bit_is_set() {}
        self.adc.isr.write(|w| w.adrdy().set_bit());
    }

    fn calibrate(&mut self) {
        self.adc.cr.modify(|_, w| w.adcal().set_bit());
        while self.adc.isr.read().eocal().bit_is_clear() {}
        self.adc.isr.write(|w| w.eocal().set_bit());
    }
}

impl Sensor for TempSensor {
    fn enable(&mut self, enabled: bool) {
        if enabled {
            self.adc.cr.modify(|_, w| w.adstart().set_bit());
        } else if self.is_running() {
            self.adc.cr.modify(|_, w| w.adstp().set_bit());
            while self.adc.cr.read().adstart().bit_is_set() {}
        }
    }

    fn is_running(&self) -> bool {
        self.adc.cr.read().adstart().bit_is_set()
    }

    fn select_channel(&mut self, channel: u8) {
        self.adc.isr.write(|w| w.ccrdy().set_bit());
        self.adc
            .chselr()
            .write(|w| unsafe { w.chsel().bits(1 << channel) });
        while self.adc.isr.read().ccrdy().bit_is_clear() {}
    }

    fn configure_result_queue(&mut self, queue: ResultQueue) {
        self.adc.cfgr1.modify(|_, w| {
            // One-shot DMA, requests stop once the channel count runs out
            w.dmacfg().clear_bit();
            w.dmaen().bit(queue.dma_requests);
            w.ovrmod().bit(queue.overwrite)
        });
    }

    fn drain_queue(&mut self) {
        while self.adc.isr.read().eoc().bit_is_set() {
            let _ = self.adc.dr.read().bits();
        }
        self.adc.isr.write(|w| {
            w.ovr().set_bit();
            w.eoc().set_bit();
            w.eos().set_bit()
        });
    }

    fn data_address(&self) -> u32 {
        &self.adc.dr as *const _ as u32
    }
}

/// DMA channel moving conversion results into the sample buffer.
pub struct SensorTransfer<C> {
    channel: C,
    destination: Option<&'static mut [u16]>,
}

impl<C> SensorTransfer<C>
where
    C: DmaChannel,
{
    /// `listen` routes transfer-complete to the channel interrupt.
    pub fn new(channel: C, listen: bool) -> Self {
        let mut transfer = SensorTransfer {
            channel,
            destination: None,
        };
        transfer.channel.set_priority_level(Priority::VeryHigh);
        transfer.channel.set_direction(Direction::FromPeripheral);
        transfer.channel.set_circular_mode(false);
        if listen {
            transfer.channel.listen(Event::TransferComplete);
        }
        transfer
    }
}

impl<C> Transfer for SensorTransfer<C>
where
    C: DmaChannel,
{
    fn configure(&mut self, config: &TransferConfig, destination: &'static mut [u16]) {
        // Length and addresses are only writable with the channel off
        self.channel.disable();
        self.channel.clear_event(Event::Any);
        self.channel.set_word_size(match config.width {
            WordSize::Bits8 => DmaWordSize::BITS8,
            WordSize::Bits16 => DmaWordSize::BITS16,
            WordSize::Bits32 => DmaWordSize::BITS32,
        });
        self.channel
            .set_peripheral_address(config.source, config.source_increment);
        self.channel.set_memory_address(
            destination.as_mut_ptr() as u32,
            config.destination_increment,
        );
        self.channel.set_transfer_length(config.count);
        self.destination = Some(destination);
    }

    fn start(&mut self) {
        atomic::compiler_fence(Ordering::Release);
        self.channel.enable();
    }

    fn is_complete(&self) -> bool {
        self.channel.event_occurred(Event::TransferComplete)
    }

    fn acknowledge(&mut self) {
        self.channel.clear_event(Event::TransferComplete);
    }

    fn release(&mut self) -> Option<&'static mut [u16]> {
        self.channel.disable();
        atomic::compiler_fence(Ordering::Acquire);
        self.destination.take()
    }
}

/// Interrupt side of the channel 1 transfer-complete event.
///
/// The channel itself belongs to the sampler, the handler only needs to
/// clear the pending flags.
pub struct TransferIrq {
    _private: (),
}

impl TransferIrq {
    // CGIF1 | CTCIF1, write one to clear
    const CHANNEL1_FLAGS: u32 = 0b11;

    pub fn new() -> Self {
        TransferIrq { _private: () }
    }

    pub fn unpend(&mut self) {
        let dma = unsafe { &(*DMA::ptr()) };
        dma.ifcr.write(|w| unsafe { w.bits(TransferIrq::CHANNEL1_FLAGS) });
    }
}
