mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::{
    decode_component, parse_chunk_size, parse_header_line, parse_request_line, split_target,
};
pub(crate) use header_encoder::{encode_field_block, encode_provisional};
pub use header_encoder::HeaderEncoder;
