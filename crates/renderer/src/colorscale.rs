//! Named color scales.
//!
//! A scale is a ramp of color stops over normalized [0, 1] positions.
//! Built-ins cover the two satellite fields; custom ramps load from JSON
//! stop definitions so styles stay configuration.

use fishspot_common::species::hex_to_rgb;
use serde::Deserialize;

use crate::{RenderError, Result};

/// One stop of a color ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Normalized position in [0, 1].
    pub position: f32,
    pub color: [u8; 3],
}

/// A piecewise-linear color ramp over normalized values.
#[derive(Debug, Clone)]
pub struct ColorScale {
    name: String,
    stops: Vec<ColorStop>,
}

impl ColorScale {
    /// Build a scale from stops, validating ordering and range.
    pub fn new(name: impl Into<String>, stops: Vec<ColorStop>) -> Result<Self> {
        if stops.is_empty() {
            return Err(RenderError::InvalidScale("no color stops".to_string()));
        }
        for w in stops.windows(2) {
            if w[0].position > w[1].position {
                return Err(RenderError::InvalidScale(
                    "color stops must be sorted by position".to_string(),
                ));
            }
        }
        if stops[0].position < 0.0 || stops[stops.len() - 1].position > 1.0 {
            return Err(RenderError::InvalidScale(
                "stop positions must lie in [0, 1]".to_string(),
            ));
        }
        Ok(Self {
            name: name.into(),
            stops,
        })
    }

    /// Look up a built-in scale by name (case-insensitive).
    pub fn named(name: &str) -> Result<Self> {
        let stops = |pairs: &[(f32, [u8; 3])]| {
            pairs
                .iter()
                .map(|&(position, color)| ColorStop { position, color })
                .collect()
        };

        let scale = match name.to_ascii_lowercase().as_str() {
            // SST ramp: deep blue through cyan/green/yellow to dark red.
            "thermal" => Self {
                name: "thermal".to_string(),
                stops: stops(&[
                    (0.0, [0, 0, 131]),
                    (0.11, [0, 60, 255]),
                    (0.36, [0, 255, 255]),
                    (0.61, [255, 255, 0]),
                    (0.86, [255, 0, 0]),
                    (1.0, [128, 0, 0]),
                ]),
            },
            // Chlorophyll ramp: pale green to dark green.
            "algae" => Self {
                name: "algae".to_string(),
                stops: stops(&[
                    (0.0, [211, 242, 163]),
                    (0.5, [75, 183, 119]),
                    (1.0, [19, 77, 56]),
                ]),
            },
            "gray" => Self {
                name: "gray".to_string(),
                stops: stops(&[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])]),
            },
            _ => return Err(RenderError::UnknownScale(name.to_string())),
        };
        Ok(scale)
    }

    /// Parse a custom ramp from a JSON definition:
    /// `{"name": "...", "stops": [{"position": 0.0, "color": "#rrggbb"}, ...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct ScaleDef {
            name: String,
            stops: Vec<StopDef>,
        }
        #[derive(Deserialize)]
        struct StopDef {
            position: f32,
            color: String,
        }

        let def: ScaleDef = serde_json::from_str(json)?;
        let stops = def
            .stops
            .iter()
            .map(|s| {
                let (r, g, b) = hex_to_rgb(&s.color).ok_or_else(|| {
                    RenderError::InvalidScale(format!("bad color '{}'", s.color))
                })?;
                Ok(ColorStop {
                    position: s.position,
                    color: [r, g, b],
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(def.name, stops)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample the ramp at a normalized position (clamped to [0, 1]).
    pub fn sample(&self, t: f32) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);

        let first = self.stops[0];
        if t <= first.position {
            return first.color;
        }
        for w in self.stops.windows(2) {
            let (a, b) = (w[0], w[1]);
            if t <= b.position {
                let span = b.position - a.position;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return interpolate_color(a.color, b.color, (t - a.position) / span);
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

/// Linear color interpolation.
fn interpolate_color(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    [
        (a[0] as f32 * t_inv + b[0] as f32 * t).round() as u8,
        (a[1] as f32 * t_inv + b[1] as f32 * t).round() as u8,
        (a[2] as f32 * t_inv + b[2] as f32 * t).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scales_exist() {
        for name in ["thermal", "algae", "gray", "THERMAL"] {
            assert!(ColorScale::named(name).is_ok(), "missing scale {name}");
        }
        assert!(matches!(
            ColorScale::named("plasma"),
            Err(RenderError::UnknownScale(_))
        ));
    }

    #[test]
    fn test_sample_endpoints() {
        let gray = ColorScale::named("gray").unwrap();
        assert_eq!(gray.sample(0.0), [0, 0, 0]);
        assert_eq!(gray.sample(1.0), [255, 255, 255]);
        // Clamped outside [0, 1].
        assert_eq!(gray.sample(-2.0), [0, 0, 0]);
        assert_eq!(gray.sample(5.0), [255, 255, 255]);
    }

    #[test]
    fn test_sample_interpolates() {
        let gray = ColorScale::named("gray").unwrap();
        let mid = gray.sample(0.5);
        assert!(mid[0] > 120 && mid[0] < 135);
        assert_eq!(mid[0], mid[1]);
        assert_eq!(mid[1], mid[2]);
    }

    #[test]
    fn test_from_json() {
        let scale = ColorScale::from_json(
            r##"{"name":"custom","stops":[
                {"position":0.0,"color":"#000000"},
                {"position":1.0,"color":"#ff0000"}
            ]}"##,
        )
        .unwrap();
        assert_eq!(scale.name(), "custom");
        assert_eq!(scale.sample(1.0), [255, 0, 0]);
    }

    #[test]
    fn test_rejects_unsorted_stops() {
        let bad = ColorScale::new(
            "bad",
            vec![
                ColorStop {
                    position: 0.5,
                    color: [0, 0, 0],
                },
                ColorStop {
                    position: 0.2,
                    color: [255, 255, 255],
                },
            ],
        );
        assert!(bad.is_err());
    }
}
