#![no_main]
#![no_std]

use lib as _;

use cortex_m::singleton;
use lib::completion::{self, Completion, Notifier};
use lib::config::{Config, Suspension, SAMPLE_COUNT};
use lib::convert::Calibration;
use lib::display::Display;
use lib::error::Error;
use lib::hw::{
    init_clock, init_oled, Clock, HwOled, HwSensor, HwTransfer, SysClock, TickTimer, TransferIrq,
};
use lib::sampler::{Buffer, Sampler};
use lib::scheduler::Scheduler;
use rtic::app;
use stm32g0xx_hal::delay::DelayExt;
use stm32g0xx_hal::dma::DmaExt;
use stm32g0xx_hal::dmamux::DmaMuxIndex;
use stm32g0xx_hal::gpio::GpioExt;
use stm32g0xx_hal::i2c::{Config as I2cConfig, I2cExt};
use stm32g0xx_hal::time::U32Ext;

#[app(device = stm32g0xx_hal::stm32, peripherals = true)]
const APP: () = {
    struct Resources {
        config: Config,
        sampler: Sampler<'static, HwSensor, HwTransfer, SAMPLE_COUNT>,
        display: Display<HwOled>,
        tick_timer: TickTimer,
        transfer_irq: TransferIrq,
        notifier: Notifier<'static>,
    }

    #[init]
    fn init(cx: init::Context) -> init::LateResources {
        let core: rtic::export::Peripherals = cx.core;
        let device: stm32g0xx_hal::stm32::Peripherals = cx.device;
        let config = Config::default();

        // Buffers
        let completion: &'static mut Completion =
            singleton!(: Completion = Completion::new()).unwrap();
        let dma_buffer: &'static mut Buffer<SAMPLE_COUNT> =
            singleton!(: Buffer<SAMPLE_COUNT> = [0; SAMPLE_COUNT]).unwrap();
        let (notifier, waiter) = completion::split(completion);

        // Clock
        let mut rcc = init_clock(device.RCC);
        let mut delay = core.SYST.delay(&mut rcc);
        let tick_timer = TickTimer::new(device.TIM6, 1_000.hz(), &mut rcc);

        // GPIO
        let gpiob = device.GPIOB.split(&mut rcc);

        // OLED
        let i2c = device.I2C1.i2c(
            gpiob.pb9.into_open_drain_output(),
            gpiob.pb8.into_open_drain_output(),
            I2cConfig::new(400.khz()),
            &mut rcc,
        );
        let oled = init_oled(i2c).unwrap();
        let display = Display::new(oled).unwrap();

        // Temperature sensor
        let dma = device.DMA.split(&mut rcc, device.DMAMUX);
        let mut ch1 = dma.ch1;
        ch1.mux().select_peripheral(DmaMuxIndex::ADC);
        let sensor = HwSensor::new(device.ADC, &mut rcc, &mut delay);
        let transfer = HwTransfer::new(ch1, config.suspension == Suspension::Interrupt);
        let sampler = Sampler::new(
            sensor,
            transfer,
            dma_buffer,
            waiter,
            Calibration::DATASHEET,
            &config,
        );

        defmt::info!("initialized, {=usize} samples per cycle", SAMPLE_COUNT);

        init::LateResources {
            config,
            sampler,
            display,
            tick_timer,
            transfer_irq: TransferIrq::new(),
            notifier,
        }
    }

    #[idle(resources = [config, sampler, display, tick_timer])]
    fn idle(mut cx: idle::Context) -> ! {
        cx.resources.tick_timer.lock(|timer: &mut TickTimer| {
            timer.start();
        });

        let mut clock = SysClock;
        let mut scheduler = Scheduler::new(*cx.resources.config, clock.now());
        match scheduler.run(cx.resources.sampler, cx.resources.display, &mut clock) {
            Error::Display(_) => defmt::error!("display transport failed"),
            Error::BufferWrite => defmt::error!("readout did not fit"),
        }
        lib::exit()
    }

    #[task(binds = DMA_CHANNEL1, priority = 2, resources = [transfer_irq, notifier])]
    fn dma(cx: dma::Context) {
        let irq: &mut TransferIrq = cx.resources.transfer_irq;
        let notifier: &mut Notifier<'static> = cx.resources.notifier;

        irq.unpend();
        notifier.notify();
    }

    #[task(binds = TIM6, priority = 3, resources = [tick_timer])]
    fn tim6(cx: tim6::Context) {
        let timer: &mut TickTimer = cx.resources.tick_timer;

        timer.unpend();
        timer.tick();
    }
};
