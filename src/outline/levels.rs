use crate::outline::{MAX_LEVEL, MIN_LEVEL};

/// Rescale raw heading depths so the shallowest becomes `MIN_LEVEL`.
///
/// Relative spacing between levels is preserved; anything that would land
/// deeper than `MAX_LEVEL` is clamped there.
pub fn normalize(levels: &[u8]) -> Vec<u8> {
    let Some(&min) = levels.iter().min() else {
        return Vec::new();
    };
    let offset = MIN_LEVEL as i16 - min as i16;
    levels
        .iter()
        .map(|&raw| (raw as i16 + offset).clamp(MIN_LEVEL as i16, MAX_LEVEL as i16) as u8)
        .collect()
}
