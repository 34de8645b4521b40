use display_interface::DisplayError;
use ssd1306::I2CDisplayInterface;
use stm32g0xx_hal::dma::C1;
use stm32g0xx_hal::gpio::gpiob::{PB8, PB9};
use stm32g0xx_hal::gpio::{OpenDrain, Output};
use stm32g0xx_hal::i2c::I2c;
use stm32g0xx_hal::rcc::{Config, PllConfig, Rcc, RccExt};
use stm32g0xx_hal::stm32g0::stm32g070::{I2C1, RCC};

use crate::hw::adc::{SensorTransfer, TempSensor};
use crate::hw::oled::Oled;

pub fn init_clock(pac_rcc: RCC) -> Rcc {
    // ((16 MHz / 4) * 32) / 2 = 64 MHz
    let pll_config = PllConfig::with_hsi(4, 32, 2);
    pac_rcc.freeze(Config::pll().pll_cfg(pll_config))
}

// PB8 - I2C1_SCL
pub type OledScl = PB8<Output<OpenDrain>>;
// PB9 - I2C1_SDA
pub type OledSda = PB9<Output<OpenDrain>>;
// ADC DMA channel
type DmaChannel = C1;

pub type OledI2c = I2c<I2C1, OledSda, OledScl>;
pub type HwOled = Oled<ssd1306::prelude::I2CInterface<OledI2c>>;
pub type HwSensor = TempSensor;
pub type HwTransfer = SensorTransfer<DmaChannel>;

pub fn init_oled(i2c: OledI2c) -> Result<HwOled, DisplayError> {
    Oled::new(I2CDisplayInterface::new(i2c))
}
