use crate::foundation::error::{PlannerError, PlannerResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Straight (non-premultiplied) RGB8 color.
///
/// Serialized as a six-digit uppercase hex string (`"EAB308"`), the form slide documents use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::hex(0xFFFFFF);
    pub const BLACK: Self = Self::hex(0x000000);

    /// Build from a packed `0xRRGGBB` literal.
    pub const fn hex(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    pub fn parse(raw: &str) -> PlannerResult<Self> {
        let digits = raw.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PlannerError::validation(format!(
                "color '{raw}' must be six hex digits"
            )));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|e| PlannerError::validation(format!("color '{raw}': {e}")))?;
        Ok(Self::hex(packed))
    }

    /// `"EAB308"`
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// `"#eab308"`
    pub fn css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `"#eab3084d"` for an alpha of `0x4d`.
    pub fn css_with_alpha(self, alpha: u8) -> String {
        format!("{}{alpha:02x}", self.css())
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Physical slide size in inches.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideSize {
    pub width_in: f64,
    pub height_in: f64,
}

impl SlideSize {
    /// 16:9 widescreen, 10in x 5.625in.
    pub const WIDE_16_9: Self = Self {
        width_in: 10.0,
        height_in: 5.625,
    };

    pub fn new(width_in: f64, height_in: f64) -> PlannerResult<Self> {
        if !(width_in.is_finite() && height_in.is_finite()) || width_in <= 0.0 || height_in <= 0.0
        {
            return Err(PlannerError::validation(
                "slide width/height must be finite and > 0",
            ));
        }
        Ok(Self {
            width_in,
            height_in,
        })
    }

    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_in, self.height_in)
    }

    /// Pixel dimensions at `px_per_inch`, rounded up.
    pub fn to_px(self, px_per_inch: f64) -> (u32, u32) {
        (
            (self.width_in * px_per_inch).ceil().max(1.0) as u32,
            (self.height_in * px_per_inch).ceil().max(1.0) as u32,
        )
    }
}

impl Default for SlideSize {
    fn default() -> Self {
        Self::WIDE_16_9
    }
}

/// English Metric Units per inch (OOXML coordinate space).
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Typographic points per inch.
pub const PT_PER_INCH: f64 = 72.0;

pub fn inches_to_emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
