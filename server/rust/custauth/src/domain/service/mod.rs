pub mod credential_extractor;
pub mod token_codec;

pub use credential_extractor::{CredentialExtractor, ExtractError};
pub use token_codec::{TokenCodec, TokenCodecError};
