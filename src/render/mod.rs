pub mod skeleton;
pub mod window;

pub use skeleton::{SkeletonProfile, ARM_CHAIN, EYE_EDGE, SKELETON_CONNECTIONS};
pub use window::MinifbRenderer;
