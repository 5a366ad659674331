use core::fmt;

/// Reasons a decode attempt can fail.
///
/// None of these are fatal: the decoder simply fails to emit a
/// [`PacketRecord`](crate::record::PacketRecord) for the current sample and keeps running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The ring buffer has not yet been filled; the decoder must not run.
    Warmup,
    /// `|threshold|` exceeded the saturation/DC-bias gate.
    ThresholdTooLarge,
    /// The 8-symbol preamble window did not show exactly 4 transitions.
    PreambleMiss,
    /// The decoded access address was not the advertising magic `0x8E89BED6`.
    WrongAccessAddress,
    /// The computed CRC24 did not match the received one.
    CrcMismatch,
    /// An AD structure's declared length overran the remaining payload.
    MalformedAdStructure,
    /// A buffer or codebook index was out of range.
    InvalidLength,
    /// A field held a value outside its accepted range.
    InvalidValue,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Error::Warmup => "ring buffer not yet full",
            Error::ThresholdTooLarge => "threshold magnitude too large",
            Error::PreambleMiss => "preamble transition count mismatch",
            Error::WrongAccessAddress => "access address is not the advertising magic",
            Error::CrcMismatch => "CRC24 mismatch",
            Error::MalformedAdStructure => "AD structure length overran remaining payload",
            Error::InvalidLength => "invalid length value specified",
            Error::InvalidValue => "invalid value for field",
        })
    }
}

impl std::error::Error for Error {}
