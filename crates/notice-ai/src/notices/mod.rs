pub mod catalog;
pub mod classifier;
pub mod domain;
pub mod prompt;

pub use catalog::{list_notices, search_notices};
pub use classifier::{
    analysis_envelope, ClassifyError, NoticeClassifier, UPSTREAM_FORMAT_MESSAGE,
    VALIDATION_MESSAGE,
};
pub use domain::{
    ClassificationResult, Importance, Notice, NoticeCategory, NoticeSubmission, SearchHit,
};
pub use prompt::build_classification_prompt;
