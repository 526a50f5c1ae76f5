//! Configuration options for HiPack loading and dumping.
//!
//! ## Examples
//!
//! ```rust
//! use hipack::{dump_with_options, hipack, HipackOptions};
//!
//! let data = hipack!({ "value": [1, 2, 3] });
//! let options = HipackOptions::compact();
//! let text = dump_with_options(data.as_dict().unwrap(), &options).unwrap();
//! assert_eq!(text, "value[1,2,3]");
//! ```

/// Nesting limit applied when no other limit is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration shared by the decoder and the encoder.
///
/// - `compact` selects the encoder's output mode: indented lines, or a
///   single line with commas between items.
/// - `max_depth` bounds list/dict nesting on both sides, so that hostile
///   input fails with an error instead of exhausting the stack.
///
/// # Examples
///
/// ```rust
/// use hipack::HipackOptions;
///
/// let options = HipackOptions::new();
/// assert!(!options.compact);
/// assert_eq!(options.max_depth, 128);
///
/// let options = HipackOptions::compact().with_max_depth(16);
/// assert!(options.compact);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HipackOptions {
    pub compact: bool,
    pub max_depth: usize,
}

impl Default for HipackOptions {
    fn default() -> Self {
        HipackOptions {
            compact: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HipackOptions {
    /// Creates default options (indented output, default nesting limit).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for single-line output.
    #[must_use]
    pub fn compact() -> Self {
        HipackOptions {
            compact: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Sets the maximum nesting depth of lists and dicts.
    ///
    /// The top-level message does not count; `with_max_depth(1)` allows
    /// `a [1]` but rejects `a [[1]]`.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
