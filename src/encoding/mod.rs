//! Encoding and decoding of Safe deployment calldata

mod decode;
mod multicall;
mod setup;
mod words;

pub use decode::{
    decode, decode_initializer, decode_with, DecodedDeployment, SetupParameters, UnparsedField,
};
pub use multicall::{encode_call, encode_multicall_data, total_value};
pub use setup::{create_proxy_call, encode_deployment, encode_setup, OWNERS_OFFSET, SETUP_HEADER};
pub use words::{find_selector, EncodedArgs, WordBuilder, WordReader, SELECTOR, WORD};
