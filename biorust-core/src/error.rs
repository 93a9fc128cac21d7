use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BioError {
    #[error("invalid character '{ch}' at position {pos}")]
    InvalidChar { ch: char, pos: usize },

    #[error("invalid frame: {frame} (must be 0, 1, or 2)")]
    InvalidFrame { frame: usize },

    #[error("integer byte out of range: {val} (expected 0..=255)")]
    IntByteOutOfRange { val: i128 },

    #[error("fasta format error at line {line}: {msg}")]
    FastaFormat { msg: &'static str, line: usize },

    #[error("fasta io error: {0}")]
    FastaIo(#[from] io::Error),

    #[error("need at least 2 sequences, got {n}")]
    TooFewSequences { n: usize },

    #[error("no valid (non-gap) sites between sequences {i} and {j}")]
    NoValidSites { i: usize, j: usize },

    #[error("{model} distance between sequences {i} and {j} is saturated")]
    SaturatedDistance {
        i: usize,
        j: usize,
        model: Box<str>,
    },

    #[error("label count {labels} does not match sequence count {seqs}")]
    LabelCountMismatch { labels: usize, seqs: usize },

    #[error("sequence {index} has length {len}, expected {expected}")]
    SequenceLengthMismatch {
        index: usize,
        len: usize,
        expected: usize,
    },

    #[error("no input sequences were provided")]
    EmptyInput,

    #[error("profiles of differing length compared: {a} vs {b}")]
    ProfileLengthMismatch { a: usize, b: usize },

    #[error("tree invariant violated at node {node}: {detail}")]
    InvariantViolation { node: usize, detail: Box<str> },
}

pub type BioResult<T> = Result<T, BioError>;
