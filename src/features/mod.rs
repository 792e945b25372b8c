//! Feature Module - declared column order and vector assembly

pub mod layout;
pub mod vector;

pub use layout::LayoutInfo;
pub use vector::FeatureVector;
