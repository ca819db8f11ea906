//! The filter engine: catalog + criteria + liked ids in, ordered view out

use foodigram_core::{Catalog, ContentItem, ItemId};
use std::collections::BTreeSet;
use tracing::debug;

use crate::FilterCriteria;

/// An ordered subset of a catalog.
///
/// Holds catalog positions rather than copies; the catalog itself is shared.
/// An empty view is a normal result, not an error.
#[derive(Debug, Clone)]
pub struct FilteredView {
    catalog: Catalog,
    positions: Vec<usize>,
}

impl FilteredView {
    /// The unfiltered view of a catalog
    pub fn full(catalog: &Catalog) -> Self {
        Self {
            catalog: catalog.clone(),
            positions: (0..catalog.len()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Item at a view index
    pub fn get(&self, index: usize) -> Option<&ContentItem> {
        self.positions
            .get(index)
            .and_then(|&pos| self.catalog.at(pos))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> + '_ {
        self.positions
            .iter()
            .filter_map(move |&pos| self.catalog.at(pos))
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.iter().map(|item| item.id).collect()
    }

    /// View index of an item, if the item is in the view
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.iter().position(|item| item.id == id)
    }

    /// Catalog positions backing this view, ascending
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

/// Derive the filtered view.
///
/// Pure: the output depends only on the three inputs. Catalog order is kept;
/// this is a stable filter, never a re-sort.
pub fn filter(
    catalog: &Catalog,
    criteria: &FilterCriteria,
    liked: &BTreeSet<ItemId>,
) -> FilteredView {
    // lowercase once per pass, not once per item
    let needle = criteria.search_needle();

    let positions: Vec<usize> = catalog
        .items()
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            needle.as_deref().map_or(true, |n| item.matches_text(n))
                && criteria.passes_category(item)
                && criteria.passes_allergens(item)
                && criteria.passes_liked(item, liked)
        })
        .map(|(pos, _)| pos)
        .collect();

    debug!(
        total = catalog.len(),
        matched = positions.len(),
        liked_only = criteria.liked_only,
        "filtered catalog"
    );

    FilteredView {
        catalog: catalog.clone(),
        positions,
    }
}
