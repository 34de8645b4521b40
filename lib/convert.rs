use crate::error::SampleError;

/// Linear model of the temperature sensor output.
///
/// `celsius = offset - (raw * v_ref / max_code - v_at_offset) / slope`
///
/// The model only holds in a narrow band around `offset`. Codes far from it
/// produce temperatures that are nowhere near physical (2048 maps to about
/// -521 C), which is a property of the curve, not an arithmetic error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Calibration {
    pub v_ref: f32,
    pub max_code: u16,
    pub offset: f32,
    pub v_at_offset: f32,
    pub slope: f32,
}

impl Calibration {
    pub const RESOLUTION: u32 = 12;
    pub const MAX_CODE: u16 = ((1u32 << Calibration::RESOLUTION) - 1) as u16;

    pub const DATASHEET: Calibration = Calibration {
        v_ref: 3.3,
        max_code: Calibration::MAX_CODE,
        offset: 27.0,
        v_at_offset: 0.706,
        slope: 0.001721,
    };

    pub fn convert(&self, raw: u16) -> f32 {
        self.celsius(raw as f32)
    }

    pub fn try_convert(&self, raw: u16) -> Result<f32, SampleError> {
        if raw > self.max_code {
            return Err(SampleError::ConversionOutOfRange(raw));
        }
        Ok(self.convert(raw))
    }

    /// Mean temperature of a filled buffer.
    ///
    /// The model is linear, so the mean of the converted samples is the
    /// conversion of the mean code. Codes are summed as integers, which keeps
    /// a buffer of identical codes bit-exact with the single-sample path.
    pub fn average(&self, samples: &[u16]) -> Result<f32, SampleError> {
        let mut sum = 0u32;
        for &raw in samples {
            if raw > self.max_code {
                return Err(SampleError::ConversionOutOfRange(raw));
            }
            sum += raw as u32;
        }
        let count = samples.len().max(1) as f32;
        Ok(self.celsius(sum as f32 / count))
    }

    fn celsius(&self, code: f32) -> f32 {
        let voltage = code * self.v_ref / self.max_code as f32;
        self.offset - (voltage - self.v_at_offset) / self.slope
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration::DATASHEET
    }
}

/// Raw 12-bit code to degrees Celsius with the datasheet calibration.
pub fn convert(raw: u16) -> f32 {
    Calibration::DATASHEET.convert(raw)
}
