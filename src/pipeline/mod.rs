pub mod detection;
pub mod extraction;
pub mod normalize;
pub mod summarize;
