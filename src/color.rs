//! `Color` value support: RGBA storage plus the original textual
//! representation the author wrote (`red`, `#ff0000`, `rgb(255, 0, 0)`, …)
//! so the serializer can preserve it when nothing has changed the color.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    /// `0.0..=1.0`
    alpha: f64,
    /// What the author originally wrote, kept only while the components
    /// remain unmodified from that representation.
    original: Option<String>,
}

impl Eq for Color {}

impl std::hash::Hash for Color {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.red.hash(state);
        self.green.hash(state);
        self.blue.hash(state);
        self.alpha.to_bits().hash(state);
    }
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8, alpha: f64) -> Self {
        Color {
            red,
            green,
            blue,
            alpha: alpha.clamp(0.0, 1.0),
            original: None,
        }
    }

    pub fn with_original(red: u8, green: u8, blue: u8, alpha: f64, original: String) -> Self {
        let mut c = Self::new(red, green, blue, alpha);
        c.original = Some(original);
        c
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Any operation that changes a channel must drop the original
    /// representation, since it no longer describes the new color.
    pub fn with_red(&self, red: u8) -> Self {
        Color::new(red, self.green, self.blue, self.alpha)
    }

    pub fn with_green(&self, green: u8) -> Self {
        Color::new(self.red, green, self.blue, self.alpha)
    }

    pub fn with_blue(&self, blue: u8) -> Self {
        Color::new(self.red, self.green, blue, self.alpha)
    }

    pub fn with_alpha(&self, alpha: f64) -> Self {
        Color::new(self.red, self.green, self.blue, alpha)
    }

    /// Legacy channel-wise color arithmetic (`#fff + #111`). Requires
    /// matching alpha, per historical Sass behavior.
    pub fn add_color(&self, other: &Color) -> Option<Color> {
        if (self.alpha - other.alpha).abs() > f64::EPSILON {
            return None;
        }
        Some(Color::new(
            self.red.saturating_add(other.red),
            self.green.saturating_add(other.green),
            self.blue.saturating_add(other.blue),
            self.alpha,
        ))
    }

    pub fn add_scalar(&self, amount: f64) -> Color {
        let clamp = |v: u8| -> u8 { (f64::from(v) + amount).clamp(0.0, 255.0) as u8 };
        Color::new(clamp(self.red), clamp(self.green), clamp(self.blue), self.alpha)
    }

    pub fn to_hsla(&self) -> (f64, f64, f64, f64) {
        let r = f64::from(self.red) / 255.0;
        let g = f64::from(self.green) / 255.0;
        let b = f64::from(self.blue) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let lightness = (max + min) / 2.0;

        if delta == 0.0 {
            return (0.0, 0.0, lightness * 100.0, self.alpha);
        }

        let saturation = if lightness <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let hue = if max == r {
            60.0 * (((g - b) / delta) % 6.0)
        } else if max == g {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let hue = if hue < 0.0 { hue + 360.0 } else { hue };

        (hue, saturation * 100.0, lightness * 100.0, self.alpha)
    }

    pub fn from_hsla(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let h = ((hue % 360.0) + 360.0) % 360.0;
        let s = (saturation / 100.0).clamp(0.0, 1.0);
        let l = (lightness / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Color::new(v, v, v, alpha);
        }

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r1, g1, b1) = match h as u32 {
            0..=59 => (c, x, 0.0),
            60..=119 => (x, c, 0.0),
            120..=179 => (0.0, c, x),
            180..=239 => (0.0, x, c),
            240..=299 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Color::new(
            (((r1 + m) * 255.0).round()) as u8,
            (((g1 + m) * 255.0).round()) as u8,
            (((b1 + m) * 255.0).round()) as u8,
            alpha,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(original) = &self.original {
            return write!(f, "{}", original);
        }
        if (self.alpha - 1.0).abs() < f64::EPSILON {
            write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {})",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_hsl() {
        let red = Color::new(255, 0, 0, 1.0);
        let (h, s, l, a) = red.to_hsla();
        let back = Color::from_hsla(h, s, l, a);
        assert_eq!(back, red);
    }

    #[test]
    fn preserves_original_representation_until_modified() {
        let named = Color::with_original(255, 0, 0, 1.0, "red".into());
        assert_eq!(named.to_string(), "red");
        let shifted = named.with_red(128);
        assert_eq!(shifted.to_string(), "#800000");
    }
}
