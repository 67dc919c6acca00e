use shulker_nbt::{Sequence, Tag};

/// One occupancy layer with its numeric key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRecord<'a> {
    pub key: i64,
    pub data: Sequence<'a>,
}

/// Normalizes the block-index section into layers sorted by key.
///
/// A list of layers keys each layer by its position. A compound keys layers
/// by decimal strings stored in arbitrary order; keys that do not parse are
/// dropped, and of several names parsing to one key (`"1"`, `"01"`) only the
/// lexicographically first is kept. Layers whose data is not a flat sequence
/// are skipped.
pub fn normalize_layers(indices: Option<&Tag>) -> Vec<LayerRecord<'_>> {
    match indices {
        Some(Tag::List(layers)) => layers
            .iter()
            .enumerate()
            .filter_map(|(position, layer)| {
                Some(LayerRecord {
                    key: position as i64,
                    data: layer.as_sequence()?,
                })
            })
            .collect(),
        Some(Tag::Compound(layers)) => {
            let mut keyed: Vec<(i64, &str, Sequence<'_>)> = layers
                .iter()
                .filter_map(|(name, layer)| {
                    let key = name.trim().parse::<i64>().ok()?;
                    Some((key, name.as_str(), layer.as_sequence()?))
                })
                .collect();
            keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
            keyed.dedup_by_key(|(key, _, _)| *key);
            keyed
                .into_iter()
                .map(|(key, _, data)| LayerRecord { key, data })
                .collect()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_list_layers_keyed_by_position() {
        let indices = Tag::List(vec![
            Tag::IntArray(vec![1, 2]),
            Tag::Int(9),
            Tag::List(vec![Tag::Int(3)]),
        ]);

        let layers = normalize_layers(Some(&indices));
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].key, 0);
        assert_eq!(layers[0].data.len(), 2);
        assert_eq!(layers[1].key, 2);
        assert_eq!(layers[1].data.number_at(0), Some(3.0));
    }

    #[test]
    fn test_compound_layers_sorted_numerically() {
        let mut map = HashMap::new();
        map.insert("10".to_string(), Tag::IntArray(vec![10]));
        map.insert("1".to_string(), Tag::IntArray(vec![1]));
        map.insert("0".to_string(), Tag::IntArray(vec![0]));
        map.insert("2".to_string(), Tag::String("not a layer".to_string()));
        map.insert("top".to_string(), Tag::IntArray(vec![99]));
        let indices = Tag::Compound(map);

        let keys: Vec<_> = normalize_layers(Some(&indices))
            .iter()
            .map(|layer| layer.key)
            .collect();
        assert_eq!(keys, vec![0, 1, 10]);
    }

    #[test]
    fn test_aliased_keys_keep_first_name() {
        let mut map = HashMap::new();
        map.insert("1".to_string(), Tag::IntArray(vec![10]));
        map.insert("01".to_string(), Tag::IntArray(vec![1]));
        map.insert(" 1".to_string(), Tag::IntArray(vec![20]));
        map.insert("0".to_string(), Tag::IntArray(vec![0]));
        let indices = Tag::Compound(map);

        let layers = normalize_layers(Some(&indices));
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].key, 1);
        // " 1" sorts before "01" and "1"
        assert_eq!(layers[1].data.number_at(0), Some(20.0));
    }

    #[test]
    fn test_absent_or_scalar_section() {
        assert!(normalize_layers(None).is_empty());
        assert!(normalize_layers(Some(&Tag::Int(0))).is_empty());
        assert!(normalize_layers(Some(&Tag::IntArray(vec![0, 1]))).is_empty());
    }
}
