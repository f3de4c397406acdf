use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ProductId = i64;
pub type SetId = i64;
pub type GroupId = i64;
pub type OptionId = i64;
pub type VariantId = i64;
pub type MediaId = i64;

/// The shopper's in-progress choice: one option per group, possibly partial.
///
/// A `BTreeMap` keeps iteration deterministic and makes duplicate group keys
/// unrepresentable. Callers are responsible for supplying ids that belong to
/// the product's configurator set; foreign ids simply match nothing.
pub type Selection = BTreeMap<GroupId, OptionId>;

/// Option ids of a selection in group order, the shape the variant queries bind.
pub fn selection_option_ids(selection: &Selection) -> Vec<OptionId> {
    selection.values().copied().collect()
}

/// Immutable product reference for the duration of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
}

impl Product {
    pub fn new(id: ProductId) -> Self {
        Self { id }
    }
}

/// Request context forwarded to the base gateway (shop scoping only; the
/// combination logic itself is context-free).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopContext {
    pub shop_id: i64,
}

impl ShopContext {
    pub fn new(shop_id: i64) -> Self {
        Self { shop_id }
    }
}
