use display_interface::{DisplayError, WriteOnlyDataCommand};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::DrawTarget;
use embedded_graphics::Drawable;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::Ssd1306;

use crate::hw::Screen;

type Panel<DI> = Ssd1306<DI, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// 128x64 SSD1306 drawn through a RAM frame buffer.
pub struct Oled<DI> {
    panel: Panel<DI>,
}

impl<DI> Oled<DI>
where
    DI: WriteOnlyDataCommand,
{
    pub fn new(interface: DI) -> Result<Self, DisplayError> {
        let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        panel.init()?;
        Ok(Oled { panel })
    }
}

impl<DI> Screen for Oled<DI>
where
    DI: WriteOnlyDataCommand,
{
    type Error = DisplayError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        DrawTarget::clear(&mut self.panel, BinaryColor::Off)
    }

    fn draw<D: Drawable<Color = BinaryColor>>(&mut self, drawable: &D)
        -> Result<D::Output, Self::Error> {
        drawable.draw(&mut self.panel)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Column and page window cover the whole panel
        self.panel.flush()
    }
}
