use core::f32::consts::TAU;
use core::fmt::Write;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{Point, Primitive};
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Pixel;
use heapless::String;
use micromath::F32Ext;

use crate::error::{Error, Result};
use crate::hw::Screen;

/// What the text line shows.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Readout {
    Celsius(f32),
    /// No reading yet, or too many failed cycles in a row
    Unavailable,
}

/// Render stage: a rotating sun above the temperature readout.
pub struct Display<SCREEN> {
    screen: SCREEN,
    frame: u32,
}

impl<SCREEN> Display<SCREEN>
where
    SCREEN: Screen,
{
    pub fn new(screen: SCREEN) -> Result<Self, SCREEN::Error> {
        let mut display = Display { screen, frame: 0 };
        display.init()?;
        Ok(display)
    }

    /// Frame counter, advanced once per `render`.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn screen(&self) -> &SCREEN {
        &self.screen
    }

    pub fn render(&mut self, readout: Readout) -> Result<(), SCREEN::Error> {
        self.screen.clear().map_err(Error::Display)?;
        self.draw_sun()?;
        self.draw_readout(readout)?;
        self.screen.flush().map_err(Error::Display)?;
        self.frame = self.frame.wrapping_add(1);
        Ok(())
    }

    fn draw_sun(&mut self) -> Result<(), SCREEN::Error> {
        for degrees in (0..360).step_by(Sun::OUTLINE_STEP_DEG) {
            let angle = degrees as f32 * TAU / 360.0;
            let point = Sun::CENTER + polar(Sun::RADIUS, angle);
            self.screen
                .draw(&Pixel(point, Color::ON))
                .map_err(Error::Display)?;
        }

        let style = PrimitiveStyle::with_stroke(Color::ON, 1);
        for ray in 0..Sun::RAYS {
            let end = Sun::CENTER + polar(Sun::RAY_LENGTH, ray_angle(ray, self.frame));
            let line = Line::new(Sun::CENTER, end).into_styled(style);
            self.screen.draw(&line).map_err(Error::Display)?;
        }
        Ok(())
    }

    fn draw_readout(&mut self, readout: Readout) -> Result<(), SCREEN::Error> {
        let mut buffer = String::<16>::new();
        let written = match readout {
            Readout::Celsius(value) => write!(&mut buffer, "Temp: {:.1}C", value),
            Readout::Unavailable => write!(&mut buffer, "Temp: --.-C"),
        };
        written.map_err(|_| Error::BufferWrite)?;

        let text = Text::with_baseline(
            &buffer,
            TextLine::POSITION,
            MonoTextStyle::new(&FONT_6X10, Color::ON),
            Baseline::Top,
        );
        self.screen.draw(&text).map_err(Error::Display)?;
        Ok(())
    }

    fn init(&mut self) -> Result<(), SCREEN::Error> {
        self.screen.clear().map_err(Error::Display)?;
        self.screen.flush().map_err(Error::Display)
    }
}

/// Angle of `ray` at `frame`, in radians within `[0, 2π)`.
pub fn ray_angle(ray: usize, frame: u32) -> f32 {
    let spacing = TAU / Sun::RAYS as f32;
    (spacing * ray as f32 + frame as f32 * Sun::ANGULAR_SPEED) % TAU
}

// Truncates towards zero like the panel coordinates expect
fn polar(radius: i32, angle: f32) -> Point {
    let radius = radius as f32;
    Point::new(
        (radius * F32Ext::cos(angle)) as i32,
        (radius * F32Ext::sin(angle)) as i32,
    )
}

pub(crate) struct Dimension;

impl Dimension {
    pub(crate) const WIDTH: i32 = 128;
    pub(crate) const HEIGHT: i32 = 64;
}

pub struct Sun;

impl Sun {
    pub const CENTER: Point = Point::new(Dimension::WIDTH / 2, Dimension::HEIGHT / 3);
    pub const RADIUS: i32 = 10;
    pub const RAY_LENGTH: i32 = Sun::RADIUS + 5;
    pub const RAYS: usize = 8;
    /// Phase advance per frame, radians
    pub const ANGULAR_SPEED: f32 = 0.2;
    const OUTLINE_STEP_DEG: usize = 10;
}

pub struct TextLine;

impl TextLine {
    pub const POSITION: Point = Point::new(24, 50);
}

struct Color;

impl Color {
    const ON: BinaryColor = BinaryColor::On;
}
