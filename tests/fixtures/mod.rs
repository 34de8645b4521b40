//! Fake collaborators for host tests.
//!
//! The sensor and the DMA channel share one `Bench`, which records every
//! hardware call in order and plays the role of the converter filling the
//! buffer.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Size};
use embedded_graphics::{Drawable, Pixel};

use lib::completion::{self, Completion, Notifier, Waiter};
use lib::config::Config;
use lib::convert::Calibration;
use lib::display::Display;
use lib::hw::{
    Clock, Duration, Instant, ResultQueue, Screen, Sensor, Transfer, TransferConfig,
};
use lib::sampler::{Buffer, Sampler};

pub const DATA_REGISTER: u32 = 0x4001_2440;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SelectChannel(u8),
    ConfigureQueue(ResultQueue),
    Drain,
    Enable(bool),
    Configure,
    Start,
    Acknowledge,
    Release,
}

#[derive(Default)]
pub struct Bench {
    pub events: Vec<Event>,
    pub running: bool,
    /// Codes the converter produces for the next cycles
    pub codes: Vec<u16>,
    /// Complete as soon as the transfer starts
    pub instant: bool,
    /// Hardware transfer-complete flag
    pub complete: bool,
    /// Codes were delivered for the armed transfer
    pub filled: bool,
    pub config: Option<TransferConfig>,
    pub destination: Option<&'static mut [u16]>,
}

impl Bench {
    pub fn in_flight(&self) -> bool {
        self.destination.is_some() && !self.filled
    }

    /// Moves the codes into the destination and raises the complete flag.
    pub fn finish(&mut self) {
        if let Some(destination) = self.destination.as_mut() {
            for (slot, code) in destination.iter_mut().zip(self.codes.iter().cycle()) {
                *slot = *code;
            }
        }
        self.filled = true;
        self.complete = true;
    }

    pub fn cycle_events(&self) -> Vec<Event> {
        self.events
            .iter()
            .copied()
            .filter(|event| !matches!(event, Event::SelectChannel(_) | Event::ConfigureQueue(_)))
            .collect()
    }
}

pub type Shared = Rc<RefCell<Bench>>;

pub fn bench(codes: &[u16]) -> Shared {
    Rc::new(RefCell::new(Bench {
        codes: codes.to_vec(),
        ..Bench::default()
    }))
}

pub struct FakeSensor(pub Shared);

impl Sensor for FakeSensor {
    fn enable(&mut self, enabled: bool) {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::Enable(enabled));
        bench.running = enabled;
    }

    fn is_running(&self) -> bool {
        self.0.borrow().running
    }

    fn select_channel(&mut self, channel: u8) {
        self.0.borrow_mut().events.push(Event::SelectChannel(channel));
    }

    fn configure_result_queue(&mut self, queue: ResultQueue) {
        self.0.borrow_mut().events.push(Event::ConfigureQueue(queue));
    }

    fn drain_queue(&mut self) {
        self.0.borrow_mut().events.push(Event::Drain);
    }

    fn data_address(&self) -> u32 {
        DATA_REGISTER
    }
}

pub struct FakeDma(pub Shared);

impl Transfer for FakeDma {
    fn configure(&mut self, config: &TransferConfig, destination: &'static mut [u16]) {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::Configure);
        bench.config = Some(*config);
        bench.destination = Some(destination);
        bench.filled = false;
        bench.complete = false;
    }

    fn start(&mut self) {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::Start);
        if bench.instant {
            bench.finish();
        }
    }

    fn is_complete(&self) -> bool {
        self.0.borrow().complete
    }

    fn acknowledge(&mut self) {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::Acknowledge);
        bench.complete = false;
    }

    fn release(&mut self) -> Option<&'static mut [u16]> {
        let mut bench = self.0.borrow_mut();
        bench.events.push(Event::Release);
        bench.destination.take()
    }
}

/// Clock that moves forward by `step` on every read.
pub struct FakeClock {
    now: Cell<u32>,
    step: u32,
}

impl FakeClock {
    pub fn new(step: u32) -> Self {
        FakeClock {
            now: Cell::new(0),
            step,
        }
    }

    pub fn millis(&self) -> u32 {
        self.now.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let now = self.now.get();
        self.now.set(now + self.step);
        Instant::from_ticks(now)
    }

    fn sleep(&mut self, duration: Duration) {
        self.now.set(self.now.get() + duration.ticks());
    }
}

/// 128x64 frame buffer.
pub struct FakeScreen {
    pub pixels: Vec<Vec<bool>>,
    pub flushes: usize,
}

impl FakeScreen {
    pub const WIDTH: usize = 128;
    pub const HEIGHT: usize = 64;

    pub fn new() -> Self {
        FakeScreen {
            pixels: vec![vec![false; FakeScreen::WIDTH]; FakeScreen::HEIGHT],
            flushes: 0,
        }
    }

    pub fn is_on(&self, x: i32, y: i32) -> bool {
        self.pixels[y as usize][x as usize]
    }

    pub fn lit_in(&self, xs: std::ops::Range<usize>, ys: std::ops::Range<usize>) -> usize {
        ys.map(|y| xs.clone().filter(|&x| self.pixels[y][x]).count())
            .sum()
    }
}

impl OriginDimensions for FakeScreen {
    fn size(&self) -> Size {
        Size::new(FakeScreen::WIDTH as u32, FakeScreen::HEIGHT as u32)
    }
}

impl DrawTarget for FakeScreen {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Infallible>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let inside = point.x >= 0
                && point.y >= 0
                && (point.x as usize) < FakeScreen::WIDTH
                && (point.y as usize) < FakeScreen::HEIGHT;
            if inside {
                self.pixels[point.y as usize][point.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Screen for FakeScreen {
    type Error = Infallible;

    fn clear(&mut self) -> Result<(), Infallible> {
        for row in self.pixels.iter_mut() {
            row.iter_mut().for_each(|pixel| *pixel = false);
        }
        Ok(())
    }

    fn draw<D: Drawable<Color = BinaryColor>>(&mut self, drawable: &D)
        -> Result<D::Output, Infallible> {
        drawable.draw(self)
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        self.flushes += 1;
        Ok(())
    }
}

pub type TestSampler<const N: usize> = Sampler<'static, FakeSensor, FakeDma, N>;

pub fn leak_buffer<const N: usize>() -> &'static mut Buffer<N> {
    Box::leak(Box::new([0; N]))
}

pub fn leak_completion() -> (Notifier<'static>, Waiter<'static>) {
    let storage: &'static mut Completion = Box::leak(Box::new(Completion::new()));
    completion::split(storage)
}

/// Sampler wired to `bench`, plus the interrupt side of its completion.
pub fn sampler<const N: usize>(
    bench: &Shared,
    config: &Config,
) -> (TestSampler<N>, Notifier<'static>) {
    let (notifier, waiter) = leak_completion();
    let sampler = Sampler::new(
        FakeSensor(bench.clone()),
        FakeDma(bench.clone()),
        leak_buffer::<N>(),
        waiter,
        Calibration::DATASHEET,
        config,
    );
    (sampler, notifier)
}

pub fn display() -> Display<FakeScreen> {
    Display::new(FakeScreen::new()).unwrap()
}

/// What the completion interrupt does: the channel finished, post it.
pub fn fire_interrupt(bench: &Shared, notifier: &mut Notifier<'static>) {
    let mut bench = bench.borrow_mut();
    if bench.in_flight() {
        bench.finish();
        // handler clears the pending bit before posting
        bench.complete = false;
        notifier.notify();
    }
}
