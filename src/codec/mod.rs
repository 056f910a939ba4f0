pub mod body;
pub mod header;

mod line_reader;
pub use line_reader::LineReader;
pub(crate) use line_reader::{CRLF, CRLF_CRLF};
