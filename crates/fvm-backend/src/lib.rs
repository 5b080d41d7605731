mod error;
mod traits;
mod types;

pub use error::BackendError;
pub use traits::{Bootstrapper, SourceFetcher};
pub use types::{Channel, ChannelParseError, Version};
