use std::collections::HashMap;

use anyhow::Result;

use crate::model::{
    AlternatePair, CombinationRow, Configurator, Group, Media, OptionId, Product, ProductId,
    Selection, ShopContext, VariantMatch,
};

/// The pre-existing configurator gateway capability. The combination
/// gateway decorates an implementation of this contract without modifying
/// it; methods it does not enhance are delegated unchanged.
#[async_trait::async_trait]
pub trait ConfiguratorGateway: Send + Sync {
    /// Full configurator tree (groups with options) for a product.
    async fn get(&self, product: &Product, context: &ShopContext) -> Result<Configurator>;

    /// Media assigned to configurator options, keyed by option id. Only
    /// consulted for picture-type configurators.
    async fn configurator_media(
        &self,
        product: &Product,
        context: &ShopContext,
    ) -> Result<HashMap<OptionId, Media>>;

    /// Unfiltered option/variant combination listing for a product.
    async fn product_combinations(&self, product: &Product) -> Result<Vec<CombinationRow>>;
}

/// Gateway that can additionally narrow combinations to the one-group-swap
/// alternates of a current selection that map to at least one real variant.
#[async_trait::async_trait]
pub trait SelectionAwareGateway: ConfiguratorGateway {
    async fn product_combinations_by_selection(
        &self,
        product: &Product,
        current_selection: &Selection,
    ) -> Result<Vec<Selection>>;
}

/// Relational queries the combination logic is built on. Data-shape
/// mismatches (unknown ids, set without groups) yield empty results, never
/// errors; connectivity failures propagate.
#[async_trait::async_trait]
pub trait ConfiguratorSource: Send + Sync {
    /// Every (group, option) pair legally assignable within the product's
    /// configurator set, restricted by the current selection when one is
    /// given: candidate options must be part of the selection, included
    /// options must not be. Ordered by (group_id, option_id) ascending.
    async fn alternate_pairs(
        &self,
        product: &Product,
        current_selection: &Selection,
    ) -> Result<Vec<AlternatePair>>;

    /// Active variants of the product whose option relations cover the
    /// selection exactly: matched relation count equals the selection size.
    async fn variant_matches(
        &self,
        product: &Product,
        selection: &Selection,
    ) -> Result<Vec<VariantMatch>>;
}

/// The pre-existing configurator service capability consumed by the
/// storefront rendering layer.
#[async_trait::async_trait]
pub trait ConfiguratorService: Send + Sync {
    /// Configuration (group/option assignment) of a single product.
    async fn product_configuration(
        &self,
        product: &Product,
        context: &ShopContext,
    ) -> Result<Vec<Group>>;

    /// Configurations for a batch of products, keyed by product id.
    async fn products_configurations(
        &self,
        products: &[Product],
        context: &ShopContext,
    ) -> Result<HashMap<ProductId, Vec<Group>>>;

    /// Configurator tree annotated against the shopper's selection.
    async fn product_configurator(
        &self,
        product: &Product,
        context: &ShopContext,
        selection: &Selection,
    ) -> Result<Configurator>;
}
