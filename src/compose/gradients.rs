use egui::Color32;

/// A linear background gradient: fixed angle, two or three stops.
#[derive(Debug, PartialEq)]
pub struct Gradient {
    pub name: &'static str,
    pub stops: &'static [Color32],
    /// CSS-style angle in degrees: 0 points up, 90 points right.
    pub angle_deg: f32,
}

/// Curated gradient palette. Indexed by `StyleState::gradient_index`;
/// out-of-range indices fall back to the first entry.
pub const GRADIENTS: &[Gradient] = &[
    // Warm
    Gradient {
        name: "Sunset",
        stops: &[Color32::from_rgb(0xf9, 0x73, 0x16), Color32::from_rgb(0xec, 0x48, 0x99)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Peach",
        stops: &[Color32::from_rgb(0xfb, 0xbf, 0x24), Color32::from_rgb(0xf4, 0x72, 0xb6)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Fire",
        stops: &[Color32::from_rgb(0xef, 0x44, 0x44), Color32::from_rgb(0xf9, 0x73, 0x16)],
        angle_deg: 135.0,
    },
    // Cool
    Gradient {
        name: "Ocean",
        stops: &[Color32::from_rgb(0x06, 0xb6, 0xd4), Color32::from_rgb(0x3b, 0x82, 0xf6)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Purple Haze",
        stops: &[Color32::from_rgb(0x8b, 0x5c, 0xf6), Color32::from_rgb(0xec, 0x48, 0x99)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Mint",
        stops: &[Color32::from_rgb(0x10, 0xb9, 0x81), Color32::from_rgb(0x06, 0xb6, 0xd4)],
        angle_deg: 135.0,
    },
    // Dark
    Gradient {
        name: "Midnight",
        stops: &[Color32::from_rgb(0x1e, 0x1b, 0x4b), Color32::from_rgb(0x31, 0x2e, 0x81)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Slate",
        stops: &[Color32::from_rgb(0x33, 0x41, 0x55), Color32::from_rgb(0x1e, 0x29, 0x3b)],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Charcoal",
        stops: &[Color32::from_rgb(0x18, 0x18, 0x1b), Color32::from_rgb(0x3f, 0x3f, 0x46)],
        angle_deg: 135.0,
    },
    // Vibrant
    Gradient {
        name: "Rainbow",
        stops: &[
            Color32::from_rgb(0xec, 0x48, 0x99),
            Color32::from_rgb(0x8b, 0x5c, 0xf6),
            Color32::from_rgb(0x3b, 0x82, 0xf6),
        ],
        angle_deg: 90.0,
    },
    Gradient {
        name: "Aurora",
        stops: &[
            Color32::from_rgb(0x22, 0xd3, 0xee),
            Color32::from_rgb(0xa8, 0x55, 0xf7),
            Color32::from_rgb(0xec, 0x48, 0x99),
        ],
        angle_deg: 135.0,
    },
    Gradient {
        name: "Banana",
        stops: &[Color32::from_rgb(0xfb, 0xbf, 0x24), Color32::from_rgb(0xf5, 0x9e, 0x0b)],
        angle_deg: 135.0,
    },
];

/// Look up a gradient by index, falling back to the first entry.
pub fn gradient(index: usize) -> &'static Gradient {
    GRADIENTS.get(index).unwrap_or(&GRADIENTS[0])
}

/// Interpolate the gradient color at `t` in `[0, 1]` along its axis.
/// Stops are evenly spaced, matching a CSS gradient without explicit
/// positions.
pub fn sample(gradient: &Gradient, t: f32) -> Color32 {
    let stops = gradient.stops;
    debug_assert!(stops.len() >= 2);
    let t = t.clamp(0.0, 1.0);
    let segments = (stops.len() - 1) as f32;
    let scaled = t * segments;
    let i = (scaled.floor() as usize).min(stops.len() - 2);
    let local = scaled - i as f32;
    lerp_color(stops[i], stops[i + 1], local)
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let l = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        l(a.r(), b.r()),
        l(a.g(), b.g()),
        l(a.b(), b.b()),
        l(a.a(), b.a()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_index_falls_back_to_first() {
        assert_eq!(gradient(GRADIENTS.len()), &GRADIENTS[0]);
        assert_eq!(gradient(usize::MAX), &GRADIENTS[0]);
        assert_eq!(gradient(3), &GRADIENTS[3]);
    }

    #[test]
    fn sample_hits_stops_at_endpoints() {
        let g = gradient(0);
        assert_eq!(sample(g, 0.0), g.stops[0]);
        assert_eq!(sample(g, 1.0), g.stops[1]);
    }

    #[test]
    fn three_stop_gradient_passes_through_middle_stop() {
        let rainbow = GRADIENTS.iter().find(|g| g.name == "Rainbow").unwrap();
        assert_eq!(sample(rainbow, 0.5), rainbow.stops[1]);
    }
}
