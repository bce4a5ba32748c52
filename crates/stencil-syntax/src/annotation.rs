//! Out-of-band metadata attached to syntax elements.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A keyed payload attached to a green element without changing its shape.
///
/// Two annotations are equal when they share a key and point at the same
/// payload allocation.
#[derive(Clone)]
pub struct Annotation {
    key: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl Annotation {
    pub fn new<T: Any + Send + Sync>(key: &'static str, value: T) -> Self {
        Self { key, value: Arc::new(value) }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Returns the payload if it has type `T`.
    pub fn value<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl PartialEq for Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Eq for Annotation {}

impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation").field("key", &self.key).finish_non_exhaustive()
    }
}

pub(crate) fn find<'a>(annotations: &'a [Annotation], key: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|annotation| annotation.key == key)
}

/// Returns a copy of `annotations` where `annotation` replaces any entry with the same key.
pub(crate) fn insert(annotations: &[Annotation], annotation: Annotation) -> Box<[Annotation]> {
    let key = annotation.key;
    annotations
        .iter()
        .filter(|existing| existing.key != key)
        .cloned()
        .chain(std::iter::once(annotation))
        .collect()
}

pub(crate) fn remove(annotations: &[Annotation], key: &str) -> Box<[Annotation]> {
    annotations.iter().filter(|existing| existing.key != key).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_same_key() {
        let first = Annotation::new("component", "Button");
        let second = Annotation::new("component", "Link");
        let other = Annotation::new("span", 3u32);

        let set = insert(&[first, other.clone()], second.clone());

        assert_eq!(set.len(), 2);
        assert_eq!(find(&set, "component"), Some(&second));
        assert_eq!(find(&set, "component").and_then(|a| a.value::<&str>()), Some(&"Link"));
        assert_eq!(find(&set, "span"), Some(&other));
    }

    #[test]
    fn value_of_wrong_type_is_none() {
        let annotation = Annotation::new("span", 3u32);
        assert_eq!(annotation.value::<u32>(), Some(&3));
        assert!(annotation.value::<String>().is_none());
        assert!(remove(&[annotation], "span").is_empty());
    }
}
