use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Immutable, reference-counted text used for command keys and labels.
///
/// Scenes are rebuilt on every edit and resize, and most keys and labels
/// (`"node-3"`, `"12.5"`) are cloned between the canvas and the backends.
/// `Arc<str>` makes those clones a refcount bump.
#[derive(Debug, Clone, Eq)]
pub struct SharedStr(Arc<str>);

impl SharedStr {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a `<prefix>-<index>` key, the form every scene key takes.
    pub fn indexed(prefix: &str, index: usize) -> Self {
        SharedStr::from(format!("{prefix}-{index}"))
    }
}

impl PartialEq for SharedStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for SharedStr {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SharedStr {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl Ord for SharedStr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for SharedStr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::hash::Hash for SharedStr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl std::ops::Deref for SharedStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SharedStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for SharedStr {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedStr {
    fn from(s: &str) -> Self {
        SharedStr(Arc::from(s))
    }
}

impl From<String> for SharedStr {
    fn from(s: String) -> Self {
        SharedStr(Arc::from(s))
    }
}

impl fmt::Display for SharedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// Hand-rolled so the serde `rc` feature stays off.
impl Serialize for SharedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SharedStr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Cow so escaped JSON strings (which cannot be borrowed) still parse.
        let s = Cow::<'de, str>::deserialize(deserializer)?;
        Ok(SharedStr(Arc::from(s.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_keys() {
        assert_eq!(SharedStr::indexed("node", 3), "node-3");
        assert_eq!(SharedStr::indexed("member-label", 0), "member-label-0");
    }

    #[test]
    fn clones_compare_equal() {
        let a = SharedStr::from("support-1");
        let b = a.clone();
        assert_eq!(a, b);
        assert_eq!(a, SharedStr::from(String::from("support-1")));
    }

    #[test]
    fn set_lookup_by_str() {
        let mut keys = std::collections::HashSet::new();
        keys.insert(SharedStr::indexed("arrow-x", 2));
        assert!(keys.contains("arrow-x-2"));
    }

    #[test]
    fn serde_accepts_escaped_text() {
        let parsed: Option<SharedStr> = serde_json::from_str("\"F = \\\"12\\\"\"").ok();
        assert_eq!(parsed.as_ref().map(SharedStr::as_str), Some("F = \"12\""));
        let json = serde_json::to_string(&SharedStr::from("12.5")).unwrap_or_default();
        assert_eq!(json, "\"12.5\"");
    }
}
