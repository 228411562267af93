use super::domain::Deviation;

pub const DEVIATION_PENALTY: f64 = 5.0;
pub const UNACCOUNTED_KM_PER_POINT: f64 = 10.0;
pub const MAX_UNACCOUNTED_PENALTY: f64 = 50.0;

/// Reduce an audit to a 0-100 triage score. More deviations or more
/// unaccounted kilometers never raise the score.
pub fn compliance_score(deviations: &[Deviation], total_unaccounted_km: f64) -> u8 {
    let deviation_penalty = deviations.len() as f64 * DEVIATION_PENALTY;
    let unaccounted_penalty = if total_unaccounted_km.is_finite() {
        (total_unaccounted_km.max(0.0) / UNACCOUNTED_KM_PER_POINT).min(MAX_UNACCOUNTED_PENALTY)
    } else {
        MAX_UNACCOUNTED_PENALTY
    };

    // Clamped to non-negative first, so round() is half-up here.
    let score = (100.0 - deviation_penalty - unaccounted_penalty).clamp(0.0, 100.0);
    score.round() as u8
}
