use rand::Rng;

/// Uniform draw from `[min, max)`. Unlike `gen_range` an empty span is fine
/// and yields `min`.
pub fn random_number<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max <= min {
        return min;
    }
    rng.gen::<f64>() * (max - min) + min
}

/// Countdown text for the header: `MM:SS`, or `Timeout` once nothing is left.
pub fn format_remaining(secs: u32) -> String {
    match secs {
        0 => "Timeout".to_string(),
        s => format!("{:02}:{:02}", s / 60, s % 60),
    }
}
