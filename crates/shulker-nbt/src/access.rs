//! Lenient, `Option`-returning accessors over a decoded tag tree.
//!
//! Structure files in the wild disagree on which numeric tag a field uses
//! (`Int` vs `Long`, `List` of ints vs `IntArray`). Callers read through
//! these accessors and pick their own defaults instead of matching on
//! exact tag kinds.

use crate::Tag;

/// A read-only view over any tag that holds an ordered run of values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sequence<'a> {
    List(&'a [Tag]),
    Bytes(&'a [i8]),
    Ints(&'a [i32]),
    Longs(&'a [i64]),
}

impl<'a> Sequence<'a> {
    pub fn len(&self) -> usize {
        match self {
            Sequence::List(v) => v.len(),
            Sequence::Bytes(v) => v.len(),
            Sequence::Ints(v) => v.len(),
            Sequence::Longs(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index` coerced with [`Tag::as_number`].
    pub fn number_at(&self, index: usize) -> Option<f64> {
        match self {
            Sequence::List(v) => v.get(index).and_then(Tag::as_number),
            Sequence::Bytes(v) => v.get(index).map(|&n| f64::from(n)),
            Sequence::Ints(v) => v.get(index).map(|&n| f64::from(n)),
            Sequence::Longs(v) => v.get(index).map(|&n| n as f64),
        }
    }

    pub fn numbers(&self) -> impl Iterator<Item = Option<f64>> + 'a {
        let seq = *self;
        (0..seq.len()).map(move |i| seq.number_at(i))
    }
}

impl Tag {
    /// Child of a compound by key.
    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.as_compound()?.get(key)
    }

    /// Walks nested compounds, e.g. `["structure", "palette", "default"]`.
    pub fn path(&self, keys: &[&str]) -> Option<&Tag> {
        keys.iter().try_fold(self, |tag, key| tag.get(key))
    }

    /// Numeric value of any scalar tag, widened to `f64`.
    ///
    /// `Long` widens exactly for magnitudes up to 2^53, far beyond any
    /// structure dimension or palette ordinal. Strings holding a decimal
    /// number are accepted; every other tag kind yields `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Tag::Byte(n) => Some(f64::from(*n)),
            Tag::Short(n) => Some(f64::from(*n)),
            Tag::Int(n) => Some(f64::from(*n)),
            Tag::Long(n) => Some(*n as f64),
            Tag::Float(n) => Some(f64::from(*n)),
            Tag::Double(n) => Some(*n),
            Tag::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<Sequence<'_>> {
        match self {
            Tag::List(v) => Some(Sequence::List(v)),
            Tag::ByteArray(v) => Some(Sequence::Bytes(v)),
            Tag::IntArray(v) => Some(Sequence::Ints(v)),
            Tag::LongArray(v) => Some(Sequence::Longs(v)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn compound(entries: Vec<(&str, Tag)>) -> Tag {
        Tag::Compound(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn test_path_walks_compounds() {
        let tree = compound(vec![(
            "structure",
            compound(vec![("palette", compound(vec![("default", Tag::Int(7))]))]),
        )]);

        assert_eq!(
            tree.path(&["structure", "palette", "default"]),
            Some(&Tag::Int(7))
        );
        assert_eq!(tree.path(&["structure", "missing"]), None);
        assert_eq!(tree.path(&["structure", "palette", "default", "deeper"]), None);
        assert_eq!(tree.path(&[]), Some(&tree));
    }

    #[test]
    fn test_long_and_int_coerce_identically() {
        assert_eq!(Tag::Long(5).as_number(), Tag::Int(5).as_number());
        assert_eq!(Tag::Long(5).as_number(), Some(5.0));
        assert_eq!(Tag::Long(40_000).as_number(), Some(40_000.0));
    }

    #[test]
    fn test_non_numeric_tags_do_not_coerce() {
        assert_eq!(Tag::String("stone".to_string()).as_number(), None);
        assert_eq!(Tag::String(" 12 ".to_string()).as_number(), Some(12.0));
        assert_eq!(Tag::List(vec![]).as_number(), None);
        assert_eq!(Tag::End.as_number(), None);
    }

    #[test]
    fn test_sequence_views() {
        let list = Tag::List(vec![Tag::Int(1), Tag::String("x".to_string()), Tag::Long(3)]);
        let seq = list.as_sequence().unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.numbers().collect::<Vec<_>>(), vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(seq.number_at(3), None);

        let ints = Tag::IntArray(vec![-1, 4]);
        assert_eq!(ints.as_sequence().unwrap().number_at(0), Some(-1.0));
        assert!(Tag::Int(1).as_sequence().is_none());
        assert!(Tag::LongArray(vec![]).as_sequence().unwrap().is_empty());
    }
}
