// Purpose - score how close a sung pitch lands to a target pitch.

/// Default tolerance: half a semitone of slack scores linearly down to zero.
pub const DEFAULT_TOLERANCE_CENTS: f32 = 50.0;

/// Score `actual` against `target` on a 0-100 scale.
///
/// The distance is measured in cents (`1200 * log2(actual / target)`) and
/// mapped linearly: 0 cents scores 100, `tolerance_cents` or further
/// scores 0. Non-positive frequencies and tolerances score 0.
pub fn calculate_accuracy(target: f32, actual: f32, tolerance_cents: f32) -> f32 {
    if target <= 0.0 || actual <= 0.0 || tolerance_cents <= 0.0 {
        return 0.0;
    }

    let cents_diff = 1200.0 * (actual / target).log2();
    (100.0 - cents_diff.abs() / tolerance_cents * 100.0).max(0.0)
}
