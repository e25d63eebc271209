//! Default value functions for serde deserialization.

pub fn min_disparity() -> f32 {
    0.0
}

pub fn homogeneous_epsilon() -> f64 {
    1e-9
}

pub fn rescale_tolerance() -> f64 {
    1e-6
}

pub fn min_baseline() -> f64 {
    1e-6
}

pub fn max_rectification_angle() -> f64 {
    1e-3
}
