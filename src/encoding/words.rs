//! Typed 32-byte word layout shared by the encoder and the decoder
//!
//! Every value is written into and read from a full big-endian word through the
//! helpers below, so padding is decided in exactly one place. An address that
//! lands one byte off does not fail loudly; it silently produces a different
//! CREATE2 address. Keep all word handling here.

use alloy::primitives::{Address, Bytes, B256, U256};

use crate::error::DecodeError;

/// Size of an ABI word in bytes
pub const WORD: usize = 32;

/// Size of a function selector in bytes
pub const SELECTOR: usize = 4;

/// An immutable call payload: a 4-byte selector followed by 32-byte words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedArgs {
    selector: [u8; SELECTOR],
    words: Vec<B256>,
}

impl EncodedArgs {
    /// Function selector
    pub fn selector(&self) -> [u8; SELECTOR] {
        self.selector
    }

    /// The argument words in order
    pub fn words(&self) -> &[B256] {
        &self.words
    }

    /// Length of the argument section, excluding the selector
    pub fn body_len(&self) -> usize {
        self.words.len() * WORD
    }

    /// Total length including the selector
    pub fn len(&self) -> usize {
        SELECTOR + self.body_len()
    }

    /// Never true: a payload always carries its selector
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Serializes selector and words into calldata
    pub fn to_bytes(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.len());
        out.extend_from_slice(&self.selector);
        for word in &self.words {
            out.extend_from_slice(word.as_slice());
        }
        Bytes::from(out)
    }
}

impl From<&EncodedArgs> for Bytes {
    fn from(args: &EncodedArgs) -> Self {
        args.to_bytes()
    }
}

/// Builder emitting one right-aligned word per value
#[derive(Debug, Clone)]
pub struct WordBuilder {
    selector: [u8; SELECTOR],
    words: Vec<B256>,
}

impl WordBuilder {
    pub fn new(selector: [u8; SELECTOR]) -> Self {
        Self {
            selector,
            words: Vec::new(),
        }
    }

    /// Appends an address, left-padded with 12 zero bytes
    pub fn address(mut self, address: Address) -> Self {
        self.words.push(address.into_word());
        self
    }

    /// Appends a uint256
    pub fn uint(mut self, value: U256) -> Self {
        self.words.push(B256::from(value.to_be_bytes::<WORD>()));
        self
    }

    /// Appends a small integer (offsets, lengths, thresholds)
    pub fn small(self, value: u64) -> Self {
        self.uint(U256::from(value))
    }

    /// Appends each address as its own word
    pub fn addresses(self, addresses: &[Address]) -> Self {
        addresses.iter().fold(self, |builder, a| builder.address(*a))
    }

    pub fn build(self) -> EncodedArgs {
        EncodedArgs {
            selector: self.selector,
            words: self.words,
        }
    }
}

/// Bounds-checked reader over a word-aligned argument section
#[derive(Debug, Clone, Copy)]
pub struct WordReader<'a> {
    data: &'a [u8],
}

impl<'a> WordReader<'a> {
    /// Creates a reader without checking alignment; reads past the end still fail
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Creates a reader, rejecting data that is not a whole number of words
    pub fn aligned(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.len() % WORD != 0 {
            return Err(DecodeError::Malformed("argument length is not a multiple of 32 bytes"));
        }
        Ok(Self { data })
    }

    /// Number of complete words available
    pub fn len(&self) -> usize {
        self.data.len() / WORD
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw word at `index`
    pub fn word(&self, index: usize) -> Result<&'a [u8], DecodeError> {
        self.bytes(index, WORD)
    }

    pub fn uint(&self, index: usize) -> Result<U256, DecodeError> {
        Ok(U256::from_be_slice(self.word(index)?))
    }

    /// Small integer word; rejects values that do not fit in a `u64`
    pub fn small(&self, index: usize) -> Result<u64, DecodeError> {
        u64::try_from(self.uint(index)?).map_err(|_| DecodeError::Malformed("integer word out of range"))
    }

    /// Address word: the low 20 bytes, with the 12 padding bytes required to be zero
    pub fn address(&self, index: usize) -> Result<Address, DecodeError> {
        let word = self.word(index)?;
        if word[..WORD - 20].iter().any(|b| *b != 0) {
            return Err(DecodeError::Malformed("address word is not left-padded with zeros"));
        }
        Ok(Address::from_slice(&word[WORD - 20..]))
    }

    /// Byte offset word, converted to a word index
    pub fn offset(&self, index: usize) -> Result<usize, DecodeError> {
        let offset = self.small(index)?;
        if offset % WORD as u64 != 0 {
            return Err(DecodeError::Malformed("offset is not word aligned"));
        }
        usize::try_from(offset / WORD as u64).map_err(|_| DecodeError::Malformed("offset out of range"))
    }

    /// `len` bytes starting at word `index`
    pub fn bytes(&self, index: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let start = index
            .checked_mul(WORD)
            .ok_or(DecodeError::Malformed("word index overflows"))?;
        let end = start
            .checked_add(len)
            .ok_or(DecodeError::Malformed("byte length overflows"))?;
        self.data
            .get(start..end)
            .ok_or(DecodeError::Malformed("calldata truncated"))
    }
}

/// Position of the first occurrence of `selector` at or after `from`
pub fn find_selector(haystack: &[u8], selector: [u8; SELECTOR], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(SELECTOR)
        .position(|window| window == selector)
        .map(|pos| pos + from)
}
