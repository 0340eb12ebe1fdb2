//! Process-wide names for dialects, operation kinds and attributes.
//!
//! Kind names are compared on every match attempt, so they are interned once
//! and compared as 4-byte keys afterwards.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use lasso::{Rodeo, Spur};
use parking_lot::RwLock;

static NAMES: LazyLock<RwLock<Rodeo>> = LazyLock::new(Default::default);

/// An interned name such as `tensor.mul`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Spur);

impl Symbol {
    /// Interns a name known at compile time.
    pub fn new(text: &'static str) -> Self {
        Self::lookup(text).unwrap_or_else(|| Self(NAMES.write().get_or_intern_static(text)))
    }

    /// Interns a name built at runtime, copying it into the table on first use.
    pub fn from_dynamic(text: &str) -> Self {
        Self::lookup(text).unwrap_or_else(|| Self(NAMES.write().get_or_intern(text)))
    }

    /// Already-interned names only take the shared lock.
    fn lookup(text: &str) -> Option<Self> {
        NAMES.read().get(text).map(Self)
    }

    /// Runs `f` on the interned text.
    ///
    /// The lock is taken recursively, so `f` may format or compare other
    /// symbols.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(NAMES.read_recursive().resolve(&self.0))
    }
}

impl From<&'static str> for Symbol {
    fn from(text: &'static str) -> Self {
        Self::new(text)
    }
}

impl From<Cow<'_, str>> for Symbol {
    fn from(text: Cow<'_, str>) -> Self {
        match text {
            Cow::Borrowed(text) => Self::from_dynamic(text),
            Cow::Owned(text) => Self::from_dynamic(&text),
        }
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|text| text == other)
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        *self == **other
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|text| f.write_str(text))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|text| f.debug_tuple("Symbol").field(&text).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_dynamic_interning_agree() {
        let a = Symbol::new("tanh");
        let b = Symbol::from_dynamic(&String::from("tanh"));
        assert_eq!(a, b);
        assert_eq!(Symbol::from(Cow::Owned(String::from("tanh"))), a);
        assert_ne!(a, Symbol::new("tan"));
    }

    #[test]
    fn compares_with_str() {
        let sym = Symbol::new("reduce_mean");
        assert!(sym == "reduce_mean");
        assert!(sym != "reduce_max");
        assert_eq!(sym.to_string(), "reduce_mean");
        assert_eq!(format!("{sym:?}"), r#"Symbol("reduce_mean")"#);
    }

    #[test]
    fn concurrent_interning_yields_one_key() {
        let names: Vec<Symbol> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| Symbol::from_dynamic("layer_norm")))
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });
        assert!(names.iter().all(|&sym| sym == Symbol::new("layer_norm")));
    }
}
