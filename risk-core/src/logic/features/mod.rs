//! Features Module - Input schema and validation
//!
//! - `layout`: Ordered feature names, version and layout hash
//! - `vector`: Validated `FeatureVector` and dense `ModelInput`
//! - `validate`: Raw JSON record → `FeatureVector`

pub mod layout;
pub mod vector;
pub mod validate;

pub use layout::{
    layout_hash, validate_feature_names, validate_layout, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use vector::{FeatureValue, FeatureVector, ModelInput};
pub use validate::{validate, validate_record, Constraint, ValidationError};
