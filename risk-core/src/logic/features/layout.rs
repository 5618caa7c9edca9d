//! Feature Layout
//!
//! Order and names of the ten model inputs. Any change to the list (adding,
//! removing or reordering a feature) bumps `FEATURE_VERSION`; model artifacts
//! carry the version and layout hash they were fitted against and are
//! refused at load time when either differs.

use crc32fast::Hasher;

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Model input order
pub const FEATURE_LAYOUT: &[&str] = &[
    // grades
    "avg_grade",                  // 0-100
    "grade_consistency",          // 0-100
    "grade_range",                // best minus worst, 0-100
    // engagement
    "num_assessments",
    "assessment_completion_rate", // 0-1
    "studied_credits",
    // history
    "num_of_prev_attempts",
    // derived flags, 0 | 1
    "low_performance",
    "low_engagement",
    "has_previous_attempts",
];

pub const FEATURE_COUNT: usize = 10;

/// CRC32 over the version byte and each name, NUL-terminated
fn hash_names<S: AsRef<str>>(version: u8, names: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);
    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

/// Hash of the current layout
pub fn layout_hash() -> u32 {
    hash_names(FEATURE_VERSION, FEATURE_LAYOUT)
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("feature layout mismatch: expected v{expected_version} ({expected_hash:08x}), got v{actual_version} ({actual_hash:08x})")]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Check the version and hash recorded in a model artifact
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let expected_hash = layout_hash();
    if version == FEATURE_VERSION && hash == expected_hash {
        return Ok(());
    }
    Err(LayoutMismatchError {
        expected_version: FEATURE_VERSION,
        expected_hash,
        actual_version: version,
        actual_hash: hash,
    })
}

/// Check an artifact's feature names, order included
pub fn validate_feature_names(names: &[String]) -> Result<(), LayoutMismatchError> {
    if names.len() == FEATURE_COUNT && names.iter().zip(FEATURE_LAYOUT).all(|(a, b)| a == b) {
        return Ok(());
    }
    Err(LayoutMismatchError {
        expected_version: FEATURE_VERSION,
        expected_hash: layout_hash(),
        actual_version: FEATURE_VERSION,
        actual_hash: hash_names(FEATURE_VERSION, names),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_hash_depends_on_version_and_order() {
        assert_eq!(layout_hash(), hash_names(FEATURE_VERSION, FEATURE_LAYOUT));
        assert_ne!(layout_hash(), hash_names(FEATURE_VERSION + 1, FEATURE_LAYOUT));

        let mut swapped = FEATURE_LAYOUT.to_vec();
        swapped.swap(0, 1);
        assert_ne!(layout_hash(), hash_names(FEATURE_VERSION, swapped.as_slice()));
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());

        let err = validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).unwrap_err();
        assert_eq!(err.expected_hash, layout_hash());
    }

    #[test]
    fn test_validate_feature_names_order_matters() {
        let mut names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(validate_feature_names(&names).is_ok());

        names.swap(0, 1);
        let err = validate_feature_names(&names).unwrap_err();
        assert_ne!(err.actual_hash, err.expected_hash);

        names.truncate(3);
        assert!(validate_feature_names(&names).is_err());
    }
}
