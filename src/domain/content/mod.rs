//! Content domain - cities, states and keypoints projected from sheet records

mod entity;

pub use entity::{
    group_keypoints, City, Keypoint, KeypointSection, State, DEFAULT_KEYPOINT_SECTION,
};
