//! Class label lists with scalar-to-sequence normalization.

use std::ops::Deref;

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered class labels attached to an image or to its geometry.
///
/// A single label is normalized into a one-element list at conversion
/// time. Order is preserved and duplicates are kept; an absent value
/// becomes an empty list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Classes(Vec<String>);

impl Classes {
    /// Creates an empty label list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a label.
    pub fn push(&mut self, label: impl Into<String>) {
        self.0.push(label.into());
    }

    /// Consumes the list, returning the labels.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Classes {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<&str> for Classes {
    fn from(label: &str) -> Self {
        Self(vec![label.to_string()])
    }
}

impl From<String> for Classes {
    fn from(label: String) -> Self {
        Self(vec![label])
    }
}

impl From<Vec<String>> for Classes {
    fn from(labels: Vec<String>) -> Self {
        Self(labels)
    }
}

impl From<Vec<&str>> for Classes {
    fn from(labels: Vec<&str>) -> Self {
        Self(labels.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for Classes {
    fn from(labels: &[&str]) -> Self {
        Self(labels.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Classes {
    fn from(labels: [&str; N]) -> Self {
        Self(labels.iter().map(|s| s.to_string()).collect())
    }
}

impl<T: Into<Classes>> From<Option<T>> for Classes {
    fn from(labels: Option<T>) -> Self {
        labels.map(Into::into).unwrap_or_default()
    }
}

impl FromIterator<String> for Classes {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Classes {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Accepts a bare string, a list of strings or null.
impl<'de> Deserialize<'de> for Classes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ClassesRepr {
            One(String),
            Many(Vec<String>),
        }

        Ok(match Option::<ClassesRepr>::deserialize(deserializer)? {
            Some(ClassesRepr::One(label)) => Classes::from(label),
            Some(ClassesRepr::Many(labels)) => Classes::from(labels),
            None => Classes::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_label_is_wrapped() {
        let classes = Classes::from("Dog");
        assert_eq!(&*classes, &["Dog".to_string()]);
    }

    #[test]
    fn test_list_is_kept_as_is() {
        let classes = Classes::from(vec!["Dog", "Cat", "Dog"]);
        assert_eq!(classes.len(), 3);
        assert_eq!(classes[0], "Dog");
        assert_eq!(classes[2], "Dog");
    }

    #[test]
    fn test_none_is_empty() {
        let classes = Classes::from(None::<&str>);
        assert!(classes.is_empty());
    }

    #[test]
    fn test_deserialize_shapes() {
        let one: Classes = serde_json::from_str("\"Dog\"").unwrap();
        assert_eq!(one, Classes::from("Dog"));

        let many: Classes = serde_json::from_str("[\"Dog\", \"Cat\"]").unwrap();
        assert_eq!(many, Classes::from(["Dog", "Cat"]));

        let null: Classes = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());

        assert!(serde_json::from_str::<Classes>("42").is_err());
    }
}
