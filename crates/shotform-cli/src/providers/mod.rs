pub mod logistic;
pub mod replay;

pub use logistic::LogisticClassifier;
pub use replay::ReplayPoseDetector;
