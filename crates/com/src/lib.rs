pub mod error;
pub use error::ComError;

mod publisher;
pub use publisher::*;

mod subscriber;
pub use subscriber::*;

/// Binary payloads larger than this are rejected on receive.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
