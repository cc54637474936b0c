use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::error::ConfigError;

const EXTENSION_INTRODUCER: u8 = 0x21;
const GRAPHIC_CONTROL_LABEL: u8 = 0xF9;
const GRAPHIC_CONTROL_BLOCK_SIZE: u8 = 0x04;
const BLOCK_TERMINATOR: u8 = 0x00;
const TRANSPARENCY_FLAG: u8 = 0x01;
const DISPOSAL_SHIFT: u8 = 2;
const MILLIS_PER_HUNDREDTH: u128 = 10;

/// Encoded length of a Graphic Control Extension block.
pub(crate) const GRAPHIC_CONTROL_LEN: usize = 8;

/// Errors returned when parsing a frame delay.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum FrameDelayError {
    #[error("invalid frame delay `{value}`; use hundredths of a second (`25`) or a duration (`250ms`)")]
    Invalid { value: String },
    #[error("frame delay `{value}` exceeds the maximum of 655.35s")]
    TooLong { value: String },
}

/// How a decoder treats a frame's pixels before drawing the next one.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DisposalMethod {
    /// No disposal specified (`0`).
    Unspecified,
    /// Leave the frame in place (`1`).
    Keep,
    /// Restore the frame area to the background colour (`2`).
    #[default]
    Background,
    /// Restore the frame area to the previous frame (`3`).
    Previous,
}

impl DisposalMethod {
    /// Returns the three-bit protocol value.
    ///
    /// ```
    /// use gif_merge::DisposalMethod;
    ///
    /// assert_eq!(0, DisposalMethod::Unspecified.as_raw());
    /// assert_eq!(2, DisposalMethod::Background.as_raw());
    /// ```
    #[must_use]
    pub const fn as_raw(self) -> u8 {
        match self {
            Self::Unspecified => 0,
            Self::Keep => 1,
            Self::Background => 2,
            Self::Previous => 3,
        }
    }

    /// Parses either a protocol value (`0`..`3`) or a name such as `background`.
    ///
    /// ```
    /// use gif_merge::DisposalMethod;
    ///
    /// assert_eq!(Some(DisposalMethod::Keep), DisposalMethod::parse_lenient("1"));
    /// assert_eq!(Some(DisposalMethod::Previous), DisposalMethod::parse_lenient("previous"));
    /// assert_eq!(None, DisposalMethod::parse_lenient("7"));
    /// ```
    #[must_use]
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.parse::<u8>() {
            Ok(raw) => Self::try_from(raw).ok(),
            Err(_) => Self::from_str(value).ok(),
        }
    }
}

impl TryFrom<u8> for DisposalMethod {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Unspecified),
            1 => Ok(Self::Keep),
            2 => Ok(Self::Background),
            3 => Ok(Self::Previous),
            _ => Err(ConfigError::InvalidDisposal { value }),
        }
    }
}

impl From<gif::DisposalMethod> for DisposalMethod {
    fn from(value: gif::DisposalMethod) -> Self {
        match value {
            gif::DisposalMethod::Any => Self::Unspecified,
            gif::DisposalMethod::Keep => Self::Keep,
            gif::DisposalMethod::Background => Self::Background,
            gif::DisposalMethod::Previous => Self::Previous,
        }
    }
}

/// Display time of one frame in hundredths of a second.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Eq,
    PartialEq,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
#[display("{_0}")]
pub struct FrameDelay(u16);

impl FrameDelay {
    /// Creates a delay from hundredths of a second.
    #[must_use]
    pub const fn from_hundredths(hundredths: u16) -> Self {
        Self(hundredths)
    }

    /// Returns the delay in hundredths of a second.
    #[must_use]
    pub const fn hundredths(self) -> u16 {
        self.0
    }
}

impl FromStr for FrameDelay {
    type Err = FrameDelayError;

    /// Parses plain hundredths (`25`) or a human duration (`250ms`, `1.5s`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(hundredths) = value.parse::<u16>() {
            return Ok(Self(hundredths));
        }
        let duration: Duration =
            humantime::parse_duration(value).map_err(|_error| FrameDelayError::Invalid {
                value: value.to_string(),
            })?;
        u16::try_from(duration.as_millis() / MILLIS_PER_HUNDREDTH)
            .map(Self)
            .map_err(|_error| FrameDelayError::TooLong {
                value: value.to_string(),
            })
    }
}

/// Graphic Control Extension synthesized for one animation frame.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GraphicControlExtension {
    disposal: DisposalMethod,
    delay_hundredths: u16,
    transparent_index: Option<u8>,
}

impl GraphicControlExtension {
    /// Creates an opaque control block.
    #[must_use]
    pub fn new(disposal: DisposalMethod, delay_hundredths: u16) -> Self {
        Self {
            disposal,
            delay_hundredths,
            transparent_index: None,
        }
    }

    /// Sets or clears the transparent palette index.
    #[must_use]
    pub fn with_transparent_index(mut self, transparent_index: Option<u8>) -> Self {
        self.transparent_index = transparent_index;
        self
    }

    /// Returns the disposal method.
    #[must_use]
    pub fn disposal(&self) -> DisposalMethod {
        self.disposal
    }

    /// Returns the delay in hundredths of a second.
    #[must_use]
    pub fn delay_hundredths(&self) -> u16 {
        self.delay_hundredths
    }

    /// Returns the transparent palette index, if any.
    #[must_use]
    pub fn transparent_index(&self) -> Option<u8> {
        self.transparent_index
    }

    /// Returns the packed-fields byte: disposal in bits 2-4, transparency flag in bit 0.
    #[must_use]
    pub fn packed_fields(&self) -> u8 {
        let transparency = if self.transparent_index.is_some() {
            TRANSPARENCY_FLAG
        } else {
            0
        };
        (self.disposal.as_raw() << DISPOSAL_SHIFT) | transparency
    }

    /// Encodes the block as `21 F9 04 <packed> <delay LE> <index> 00`.
    ///
    /// ```
    /// use gif_merge::{DisposalMethod, GraphicControlExtension};
    ///
    /// let gce = GraphicControlExtension::new(DisposalMethod::Background, 300)
    ///     .with_transparent_index(Some(5));
    /// assert_eq!(
    ///     [0x21, 0xF9, 0x04, 0x09, 0x2C, 0x01, 0x05, 0x00],
    ///     gce.encode()
    /// );
    /// ```
    #[must_use]
    pub fn encode(&self) -> [u8; GRAPHIC_CONTROL_LEN] {
        let [delay_low, delay_high] = self.delay_hundredths.to_le_bytes();
        [
            EXTENSION_INTRODUCER,
            GRAPHIC_CONTROL_LABEL,
            GRAPHIC_CONTROL_BLOCK_SIZE,
            self.packed_fields(),
            delay_low,
            delay_high,
            self.transparent_index.unwrap_or(0),
            BLOCK_TERMINATOR,
        ]
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::unspecified(DisposalMethod::Unspecified, 0x00)]
    #[case::keep(DisposalMethod::Keep, 0x04)]
    #[case::background(DisposalMethod::Background, 0x08)]
    #[case::previous(DisposalMethod::Previous, 0x0C)]
    fn packed_fields_shift_disposal(#[case] disposal: DisposalMethod, #[case] expected: u8) {
        assert_eq!(expected, GraphicControlExtension::new(disposal, 0).packed_fields());
    }

    #[test]
    fn encode_without_transparency_uses_zero_index() {
        let gce = GraphicControlExtension::new(DisposalMethod::Background, 10);
        assert_eq!([0x21, 0xF9, 0x04, 0x08, 0x0A, 0x00, 0x00, 0x00], gce.encode());
    }

    #[test]
    fn encode_with_transparency_sets_flag_and_index() {
        let gce = GraphicControlExtension::new(DisposalMethod::Unspecified, 0x0102)
            .with_transparent_index(Some(0xAB));
        assert_eq!([0x21, 0xF9, 0x04, 0x01, 0x02, 0x01, 0xAB, 0x00], gce.encode());
    }

    #[test]
    fn disposal_try_from_rejects_out_of_range() {
        assert_matches!(
            DisposalMethod::try_from(4),
            Err(ConfigError::InvalidDisposal { value: 4 })
        );
    }

    #[rstest]
    #[case::name("background", DisposalMethod::Background)]
    #[case::upper_case("KEEP", DisposalMethod::Keep)]
    #[case::raw("3", DisposalMethod::Previous)]
    fn disposal_parse_lenient_accepts_names_and_values(
        #[case] input: &str,
        #[case] expected: DisposalMethod,
    ) {
        assert_eq!(Some(expected), DisposalMethod::parse_lenient(input));
    }

    #[test]
    fn disposal_displays_kebab_case() {
        assert_eq!("background", DisposalMethod::Background.to_string());
    }

    #[rstest]
    #[case::hundredths("25", 25)]
    #[case::millis("250ms", 25)]
    #[case::seconds("2s", 200)]
    #[case::truncates_sub_hundredth("15ms", 1)]
    fn frame_delay_parses_hundredths_and_durations(#[case] input: &str, #[case] expected: u16) {
        assert_eq!(Ok(FrameDelay::from_hundredths(expected)), input.parse());
    }

    #[test]
    fn frame_delay_rejects_overflow() {
        assert_matches!(
            "700s".parse::<FrameDelay>(),
            Err(FrameDelayError::TooLong { .. })
        );
    }

    #[test]
    fn frame_delay_rejects_garbage() {
        assert_matches!(
            "soon".parse::<FrameDelay>(),
            Err(FrameDelayError::Invalid { .. })
        );
    }
}
