//! Tunables for outline derivation and panel synchronization.
//!
//! Shipped behavior is fixed at build time; the builders exist so hosts and
//! tests can embed the controller with different constants.
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `debounce` | 250ms | Quiet period before a triggered rebuild runs |
//! | `min_items` | 2 | Smallest outline worth showing |
//! | `numbered_max_chars` | 80 | Text must be shorter than this to count as a numbered heading |
//! | `bold_max_chars` | 10 | Longest bold lead accepted as a heading |
//! | `band` | 20px / 60% | Viewport band that drives the active item |

use std::time::Duration;

use crate::engine::scroll::IntersectionBand;
use crate::outline::numbered::PrefixTable;

/// Default quiet period before a rebuild.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Default minimum number of items for an outline to be shown.
pub const DEFAULT_MIN_ITEMS: usize = 2;

/// Default exclusive cap on numbered-heading text length.
pub const DEFAULT_NUMBERED_MAX_CHARS: usize = 80;

/// Default inclusive cap on bold-lead text length.
pub const DEFAULT_BOLD_MAX_CHARS: usize = 10;

/// Prefix for synthesized anchor identifiers.
pub const DEFAULT_ID_PREFIX: &str = "toc-heading-";

#[derive(Debug, Clone)]
pub struct OutlineConfig {
    /// Quiet period before a triggered rebuild runs.
    pub debounce: Duration,
    /// A strategy must produce at least this many items to win the cascade.
    pub min_items: usize,
    /// Numbered-prefix candidates must have fewer characters than this.
    pub numbered_max_chars: usize,
    /// Bold leads may have at most this many characters.
    pub bold_max_chars: usize,
    /// Ordered prefix rules for the numbered heuristic.
    pub prefixes: PrefixTable,
    /// Viewport band used for active-item tracking.
    pub band: IntersectionBand,
    /// Prefix for identifiers given to anchors that have none.
    pub id_prefix: String,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            min_items: DEFAULT_MIN_ITEMS,
            numbered_max_chars: DEFAULT_NUMBERED_MAX_CHARS,
            bold_max_chars: DEFAULT_BOLD_MAX_CHARS,
            prefixes: PrefixTable::default(),
            band: IntersectionBand::default(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl OutlineConfig {
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Clamped to at least 1 so an empty outline can never be "viable".
    #[must_use]
    pub fn with_min_items(mut self, min_items: usize) -> Self {
        self.min_items = min_items.max(1);
        self
    }

    #[must_use]
    pub fn with_numbered_max_chars(mut self, max: usize) -> Self {
        self.numbered_max_chars = max;
        self
    }

    #[must_use]
    pub fn with_bold_max_chars(mut self, max: usize) -> Self {
        self.bold_max_chars = max;
        self
    }

    #[must_use]
    pub fn with_prefixes(mut self, prefixes: PrefixTable) -> Self {
        self.prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn with_band(mut self, band: IntersectionBand) -> Self {
        self.band = band;
        self
    }

    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }
}
