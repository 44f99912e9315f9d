pub mod links;
pub mod producthunt;
pub mod taaft;
pub mod trending;

use std::collections::HashSet;

use crate::record::RawItem;

/// Recovers raw items from one fetched blob. Pure: same input, same output, same order.
pub trait Extractor {
    type Input: ?Sized;

    fn extract(&self, input: &Self::Input) -> Vec<RawItem>;
}

/// Keep the first item per dedup key, in input order.
pub fn first_occurrence<I>(items: I) -> Vec<RawItem>
where
    I: IntoIterator<Item = RawItem>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.key.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, name: &str) -> RawItem {
        RawItem {
            key: key.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn keeps_first_per_key() {
        let items = vec![item("a", "first"), item("b", "b"), item("a", "second"), item("a", "third")];
        let kept = first_occurrence(items);
        let names: Vec<&str> = kept.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first", "b"]);
    }
}
