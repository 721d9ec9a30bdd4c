//! Facet descriptors and facet selections for category filtering.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a facet is presented and matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetKind {
    /// A list of checkbox options.
    MultiSelect,
    /// A numeric min/max slider.
    Range,
}

/// One selectable option of a multi-select facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetOption {
    /// Option label; unique within its facet.
    pub label: String,
    /// Advertised number of matching products.
    pub count: u32,
}

impl FacetOption {
    /// Create a facet option.
    #[must_use]
    pub fn new(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A filterable attribute dimension offered for a category.
///
/// Serializes as `{ id, title, kind, options, min?, max? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDescriptor {
    /// Facet ID used as the key in [`SelectedFacets`].
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Presentation kind.
    pub kind: FacetKind,
    /// Options for [`FacetKind::MultiSelect`]; empty for ranges.
    #[serde(default)]
    pub options: Vec<FacetOption>,
    /// Lower bound for [`FacetKind::Range`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    /// Upper bound for [`FacetKind::Range`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl FacetDescriptor {
    /// Create a multi-select facet.
    #[must_use]
    pub fn multi_select(
        id: impl Into<String>,
        title: impl Into<String>,
        options: Vec<FacetOption>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: FacetKind::MultiSelect,
            options,
            min: None,
            max: None,
        }
    }

    /// Create a range facet.
    #[must_use]
    pub fn range(id: impl Into<String>, title: impl Into<String>, min: Decimal, max: Decimal) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: FacetKind::Range,
            options: Vec::new(),
            min: Some(min),
            max: Some(max),
        }
    }

    /// Look up an option by label.
    #[must_use]
    pub fn option(&self, label: &str) -> Option<&FacetOption> {
        self.options.iter().find(|o| o.label == label)
    }
}

/// The shopper's current selection: facet ID to selected option labels.
///
/// A facet that is absent or has an empty set places no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedFacets(BTreeMap<String, BTreeSet<String>>);

impl SelectedFacets {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `label` to the selection for `facet_id`.
    pub fn select(&mut self, facet_id: impl Into<String>, label: impl Into<String>) {
        self.0.entry(facet_id.into()).or_default().insert(label.into());
    }

    /// Builder form of [`SelectedFacets::select`].
    #[must_use]
    pub fn with(mut self, facet_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.select(facet_id, label);
        self
    }

    /// Remove `label` from the selection for `facet_id`.
    pub fn deselect(&mut self, facet_id: &str, label: &str) {
        if let Some(labels) = self.0.get_mut(facet_id) {
            labels.remove(label);
        }
    }

    /// Selected labels for `facet_id` (empty if none).
    pub fn labels(&self, facet_id: &str) -> impl Iterator<Item = &str> {
        self.0
            .get(facet_id)
            .into_iter()
            .flat_map(|labels| labels.iter().map(String::as_str))
    }

    /// Facets that carry at least one selected label.
    pub fn active(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0
            .iter()
            .filter(|(_, labels)| !labels.is_empty())
            .map(|(id, labels)| (id.as_str(), labels))
    }

    /// `true` when no facet constrains the result.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.active().next().is_none()
    }
}

impl<K, L> FromIterator<(K, L)> for SelectedFacets
where
    K: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        let mut selected = Self::new();
        for (facet_id, label) in iter {
            selected.select(facet_id, label);
        }
        selected
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sets_are_unconstrained() {
        let mut selected = SelectedFacets::new();
        assert!(selected.is_unconstrained());

        selected.select("brand", "COSRX");
        assert!(!selected.is_unconstrained());

        selected.deselect("brand", "COSRX");
        assert!(selected.is_unconstrained());
        assert_eq!(selected.labels("brand").count(), 0);
    }

    #[test]
    fn test_from_pairs() {
        let selected: SelectedFacets =
            [("brand", "COSRX"), ("brand", "Laneige"), ("skinType", "Dry")]
                .into_iter()
                .collect();
        assert_eq!(selected.labels("brand").collect::<Vec<_>>(), ["COSRX", "Laneige"]);
        assert_eq!(selected.active().count(), 2);
    }

    #[test]
    fn test_descriptor_json_shape() {
        let facet = FacetDescriptor::range("price", "Price Range", Decimal::ZERO, Decimal::ONE_HUNDRED);
        let json = serde_json::to_value(&facet).unwrap();
        assert_eq!(json["kind"], "range");
        assert_eq!(json["options"].as_array().unwrap().len(), 0);
        assert_eq!(json["max"], "100");

        let brand = FacetDescriptor::multi_select("brand", "Brand", vec![FacetOption::new("COSRX", 18)]);
        let json = serde_json::to_value(&brand).unwrap();
        assert_eq!(json["kind"], "multi_select");
        assert!(json.get("min").is_none());
        assert_eq!(brand.option("COSRX").unwrap().count, 18);
    }
}
