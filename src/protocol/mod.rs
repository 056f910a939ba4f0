mod message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod headers;
pub use headers::HeaderMap;

mod request;
pub use request::RequestHead;

mod response;
pub(crate) use response::reason_phrase;
pub use response::ResponseHead;

mod error;
pub use error::HttpError;
