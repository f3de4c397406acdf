use serde::{Deserialize, Serialize};

use crate::model::{GroupId, OptionId, VariantId};

/// One row of the variant-coverage query: an active variant of the product
/// together with how many of its option relations the selection matched and
/// the stock figures the store policy needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantMatch {
    pub variant_id: VariantId,
    pub relation_count: i64,
    pub last_stock: bool,
    pub in_stock: i64,
    pub min_purchase: i64,
}

impl VariantMatch {
    /// Stock-sufficiency rule behind the store's "hide items with no stock"
    /// policy: variants that do not track last stock always qualify,
    /// otherwise available stock must cover the minimum purchase quantity.
    pub fn satisfies_stock_policy(&self) -> bool {
        !self.last_stock || self.in_stock >= self.min_purchase
    }
}

/// A candidate (group, option) pair: "group X could have option Y as an
/// answer" within the product's configurator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternatePair {
    pub group_id: GroupId,
    pub option_id: OptionId,
}

/// One row of the base gateway's unfiltered combination listing: an option
/// and the numbers of all variants carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationRow {
    pub option_id: OptionId,
    pub variant_numbers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(last_stock: bool, in_stock: i64, min_purchase: i64) -> VariantMatch {
        VariantMatch {
            variant_id: 1,
            relation_count: 1,
            last_stock,
            in_stock,
            min_purchase,
        }
    }

    #[test]
    fn stock_policy_ignores_figures_when_last_stock_disabled() {
        assert!(variant(false, 0, 1).satisfies_stock_policy());
        assert!(variant(false, -5, 100).satisfies_stock_policy());
    }

    #[test]
    fn stock_policy_requires_min_purchase_when_last_stock_enabled() {
        assert!(!variant(true, 0, 1).satisfies_stock_policy());
        assert!(variant(true, 1, 1).satisfies_stock_policy());
        assert!(variant(true, 5, 3).satisfies_stock_policy());
        assert!(!variant(true, 2, 3).satisfies_stock_policy());
    }
}
