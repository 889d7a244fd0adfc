pub mod coerce;
pub mod extractor;
pub mod retry;

pub use coerce::coerce;
pub use extractor::extract_json;
pub use retry::{RetryStrategy, Sleeper, TokioSleeper};
