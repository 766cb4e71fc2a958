const ARROWS: [char; 8] = ['↑', '↗', '→', '↘', '↓', '↙', '←', '↖'];

/// Eight-point compass arrow for a wind bearing in degrees.
///
/// Each arrow covers 45° centred on its compass point, so the boundaries sit
/// at 22.5°, 67.5°, … and a bearing on a boundary belongs to the next arrow
/// clockwise.
pub fn arrow(bearing_deg: f64) -> char {
    let normalized = bearing_deg.rem_euclid(360.0);
    let bucket = ((normalized + 22.5) / 45.0).floor() as usize % ARROWS.len();
    ARROWS[bucket]
}
