//! Centralized defaults
//!
//! Single source of truth for the tunables that settings fall back to.

/// Constraint extraction
pub mod extraction {
    /// Most recent user turns scanned for carry-over
    pub const HISTORY_TURNS: usize = 5;

    /// Smallest number accepted as a budget ceiling
    pub const MIN_BUDGET: u64 = 50;

    /// Brands kept per utterance
    pub const MAX_BRANDS: usize = 2;
}

/// Catalog filtering and selection
pub mod filter {
    /// Lines picked across the price spectrum when no budget is known
    pub const REPRESENTATIVE_COUNT: usize = 5;

    /// In-budget alternatives offered next to a budget-exceeded notice
    pub const ALTERNATIVES_COUNT: usize = 3;

    /// Lines listed in "most expensive first" fallbacks
    pub const TOP_COUNT: usize = 5;
}

/// Reply post-validation
pub mod validator {
    /// Quoted prices within this absolute distance are left alone
    pub const ABSOLUTE_TOLERANCE: f64 = 10.0;

    /// Quoted prices within this fraction of the real price are left alone
    pub const RELATIVE_TOLERANCE: f64 = 0.10;
}

/// Reply generator calls
pub mod generator {
    pub const MAX_ATTEMPTS: u32 = 3;
    pub const INITIAL_BACKOFF_MS: u64 = 200;

    /// Reply the generator returns when its safety filter blocked the answer
    pub const SAFETY_BLOCK_REPLY: &str = "[[SAFETY_BLOCKED]]";
}

/// Typed catalog search
pub mod search {
    pub const MAX_RESULTS: usize = 10;
}

/// Conversation history
pub mod history {
    /// Entries fetched per request
    pub const LIMIT: usize = 10;

    /// Entries retained per user by the in-memory provider
    pub const MAX_ENTRIES_PER_USER: usize = 50;
}
