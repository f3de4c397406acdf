use std::collections::HashMap;

use anyhow::Result;
use log::debug;

use crate::config::StoreSettings;
use crate::model::{
    CombinationRow, Configurator, Media, OptionId, Product, Selection, ShopContext,
};
use crate::store::traits::{ConfiguratorGateway, ConfiguratorSource, SelectionAwareGateway};

/// Decorator around a base [`ConfiguratorGateway`] that adds selection-aware
/// combination filtering: starting from the shopper's partial selection it
/// enumerates every one-group-swap alternate and keeps only those that map
/// to at least one existing active variant, honoring the store's
/// "hide items with no stock" policy.
///
/// The unfiltered [`product_combinations`] listing of the wrapped gateway is
/// preserved unchanged.
///
/// [`product_combinations`]: ConfiguratorGateway::product_combinations
pub struct CombinationGateway<G, S> {
    decorated: G,
    source: S,
    settings: StoreSettings,
}

impl<G, S> CombinationGateway<G, S>
where
    G: ConfiguratorGateway,
    S: ConfiguratorSource,
{
    pub fn new(decorated: G, source: S, settings: StoreSettings) -> Self {
        Self {
            decorated,
            source,
            settings,
        }
    }

    /// True iff at least one active variant of the product covers the
    /// selection exactly (matched relation count equals the selection size)
    /// and, when the hide-out-of-stock policy is enabled, passes the
    /// stock-sufficiency rule.
    pub async fn selection_has_variants(
        &self,
        product: &Product,
        selection: &Selection,
    ) -> Result<bool> {
        let matches = self.source.variant_matches(product, selection).await?;

        if self.settings.hide_no_instock {
            Ok(matches.iter().any(|m| m.satisfies_stock_policy()))
        } else {
            Ok(!matches.is_empty())
        }
    }
}

#[async_trait::async_trait]
impl<G, S> ConfiguratorGateway for CombinationGateway<G, S>
where
    G: ConfiguratorGateway,
    S: ConfiguratorSource,
{
    async fn get(&self, product: &Product, context: &ShopContext) -> Result<Configurator> {
        self.decorated.get(product, context).await
    }

    async fn configurator_media(
        &self,
        product: &Product,
        context: &ShopContext,
    ) -> Result<HashMap<OptionId, Media>> {
        self.decorated.configurator_media(product, context).await
    }

    async fn product_combinations(&self, product: &Product) -> Result<Vec<CombinationRow>> {
        self.decorated.product_combinations(product).await
    }
}

#[async_trait::async_trait]
impl<G, S> SelectionAwareGateway for CombinationGateway<G, S>
where
    G: ConfiguratorGateway,
    S: ConfiguratorSource,
{
    async fn product_combinations_by_selection(
        &self,
        product: &Product,
        current_selection: &Selection,
    ) -> Result<Vec<Selection>> {
        let pairs = self
            .source
            .alternate_pairs(product, current_selection)
            .await?;
        let candidate_count = pairs.len();

        let mut possible_selections = Vec::new();
        for pair in pairs {
            // One-group swap: overwrite the pair's group with the alternate
            // option, keep every other chosen option.
            let mut possible_selection = current_selection.clone();
            possible_selection.insert(pair.group_id, pair.option_id);

            if self
                .selection_has_variants(product, &possible_selection)
                .await?
            {
                possible_selections.push(possible_selection);
            }
        }

        debug!(
            "product {}: kept {} of {} candidate selections",
            product.id,
            possible_selections.len(),
            candidate_count
        );

        Ok(possible_selections)
    }
}
