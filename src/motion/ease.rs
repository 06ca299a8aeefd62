/// Timing curves, named after the power/expo families hosts usually ship.
///
/// `PowerN` is a polynomial of degree `N + 1`, so `Power3InOut` is quartic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    Power1Out,
    Power2InOut,
    Power3Out,
    Power3InOut,
    ExpoInOut,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Power1Out => ease_out(t, |p| p.powi(2)),
            Self::Power2InOut => ease_in_out(t, |p| p.powi(3)),
            Self::Power3Out => ease_out(t, |p| p.powi(4)),
            Self::Power3InOut => ease_in_out(t, |p| p.powi(4)),
            Self::ExpoInOut => ease_in_out(t, expo_in),
        }
    }
}

fn ease_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    1.0 - ease_in(1.0 - t)
}

fn ease_in_out(t: f64, ease_in: impl Fn(f64) -> f64) -> f64 {
    if t < 0.5 {
        ease_in(t * 2.0) / 2.0
    } else {
        1.0 - ease_in((1.0 - t) * 2.0) / 2.0
    }
}

fn expo_in(p: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        2f64.powf(10.0 * (p - 1.0))
    }
}
