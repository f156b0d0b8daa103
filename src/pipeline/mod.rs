//! Streaming load of record files into the graph

mod cancel;
mod load;
mod rate;

pub use cancel::CancellationToken;
pub use load::{load_records, LoadError, LoadOptions, LoadReport, LoadResult};
pub use rate::RateLimit;
