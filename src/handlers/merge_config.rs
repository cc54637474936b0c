use std::sync::Arc;

use bon::Builder;

use super::DisposalMethod;
use crate::{SentinelColour, TransparencyMatcher};

/// Output layout policy for inputs the historical encoder handled loosely.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CompatibilityMode {
    /// Byte-exact with the historical encoder.
    ///
    /// Retained local tables declare the first frame's size exponent, and a
    /// first frame without a global colour table produces a header without a
    /// logical screen descriptor or loop extension.
    #[default]
    Legacy,
    /// Retained local tables declare their own size, and the header always
    /// carries the logical screen descriptor and loop extension.
    Strict,
}

/// Merge settings, fixed for the lifetime of one merge.
///
/// ```
/// use std::sync::Arc;
///
/// use gif_merge::{CompatibilityMode, DisposalMethod, MergeConfig, NoTransparency};
///
/// let config = MergeConfig::builder()
///     .delays(vec![10, 20])
///     .loop_count(3)
///     .disposal(DisposalMethod::Keep)
///     .compatibility(CompatibilityMode::Strict)
///     .transparency(Arc::new(NoTransparency))
///     .build();
/// assert_eq!(&[10_u16, 20], config.delays());
/// assert_eq!(3, config.loop_count());
/// ```
#[derive(Debug, Clone, Builder)]
pub struct MergeConfig {
    /// Display time of each frame in hundredths of a second, one per frame.
    delays: Vec<u16>,
    /// Number of repetitions; `0` loops forever.
    #[builder(default)]
    loop_count: u16,
    /// Disposal applied uniformly to every frame.
    #[builder(default)]
    disposal: DisposalMethod,
    #[builder(default)]
    compatibility: CompatibilityMode,
    #[builder(default = default_transparency())]
    transparency: Arc<dyn TransparencyMatcher>,
}

impl MergeConfig {
    /// Returns the per-frame delays in hundredths of a second.
    #[must_use]
    pub fn delays(&self) -> &[u16] {
        &self.delays
    }

    /// Returns the loop count written to the Netscape extension.
    #[must_use]
    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    /// Returns the disposal method applied to every frame.
    #[must_use]
    pub fn disposal(&self) -> DisposalMethod {
        self.disposal
    }

    /// Returns the output compatibility mode.
    #[must_use]
    pub fn compatibility(&self) -> CompatibilityMode {
        self.compatibility
    }

    /// Returns the transparency strategy.
    #[must_use]
    pub fn transparency(&self) -> &dyn TransparencyMatcher {
        self.transparency.as_ref()
    }
}

fn default_transparency() -> Arc<dyn TransparencyMatcher> {
    Arc::new(SentinelColour::WHITE)
}
