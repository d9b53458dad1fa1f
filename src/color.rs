use anyhow::bail;

/// An sRGB color with components in `0.0..=1.0`.
///
/// Colors are stored in sRGB because that is what the UI and the
/// `#rrggbb` strings speak; [`Color::to_linear`] converts for the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Parses a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> anyhow::Result<Self> {
        let digits = match hex.strip_prefix('#') {
            Some(digits) if digits.len() == 6 => digits,
            _ => bail!("expected a color of the form #rrggbb, got {:?}", hex),
        };

        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;

        Ok(Self::rgb8(r, g, b))
    }

    #[allow(dead_code)]
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8
        )
    }

    /// Converts to linear RGB with the given alpha, for shading.
    pub fn to_linear(self) -> [f32; 4] {
        [
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
            1.0,
        ]
    }

    pub fn scaled(self, intensity: f32) -> [f32; 4] {
        let [r, g, b, _] = self.to_linear();
        [r * intensity, g * intensity, b * intensity, 1.0]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Color::from_hex("#ff0000").unwrap(), Color::rgb8(255, 0, 0));
        assert_eq!(Color::from_hex("#00ff00").unwrap(), Color::rgb8(0, 255, 0));
        assert_eq!(
            Color::from_hex("#16213e").unwrap(),
            Color::rgb8(0x16, 0x21, 0x3e)
        );
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(Color::from_hex("ff0000").is_err());
        assert!(Color::from_hex("#ff00").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn hex_round_trips() {
        for hex in ["#ff0000", "#00ff00", "#0000ff", "#ffff00", "#16213e"] {
            assert_eq!(Color::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn linear_conversion_endpoints() {
        let black = Color::rgb(0.0, 0.0, 0.0).to_linear();
        assert_eq!(black, [0.0, 0.0, 0.0, 1.0]);

        let white = Color::rgb(1.0, 1.0, 1.0).to_linear();
        for c in &white[0..3] {
            assert!((c - 1.0).abs() < 1e-5);
        }
    }
}
