pub mod decoder;
pub mod keypoint;
pub mod store;

pub use decoder::{decode, POSE_DATA_ADDR};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
pub use store::{PoseStore, StorePolicy};
