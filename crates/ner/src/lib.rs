pub mod recognizer;
pub mod remote;
pub mod types;

pub use recognizer::{DeadlineRecognizer, DisabledRecognizer, EntityRecognizer, MockRecognizer, NerError};
#[cfg(feature = "remote")]
pub use remote::HttpRecognizer;
pub use remote::parse_inference_response;
pub use types::{Entity, EntityLabel};
