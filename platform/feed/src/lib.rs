#![forbid(unsafe_code)]

pub mod cache;
pub mod client;
pub mod error;
pub mod feed;
pub mod photo;

pub use cache::Cache;
pub use client::{GqlTransport, HttpTransport};
pub use error::ClientError;
pub use feed::Feed;
pub use photo::{Photo, PhotoCard, PhotoView};
