//! Global string interner for unit type and upgrade names.
//!
//! A replay repeats the same few hundred type names thousands of times; events
//! and units store a 4-byte key instead of an owned `String`.

use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};

pub type IStr = Spur;

static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Intern a string, returning its key. Safe to call from decoder threads.
pub fn intern(s: &str) -> IStr {
    INTERNER.get_or_intern(s)
}

/// Resolve a key produced by [`intern`].
pub fn resolve(key: IStr) -> &'static str {
    INTERNER.resolve(&key)
}
