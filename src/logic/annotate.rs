use std::collections::HashMap;

use anyhow::Result;

use crate::model::{
    Configurator, ConfiguratorType, Group, Product, ProductId, Selection, ShopContext,
};
use crate::store::traits::{ConfiguratorGateway, ConfiguratorService, SelectionAwareGateway};

/// Decorator around a base [`ConfiguratorService`] that annotates the
/// configurator tree against the shopper's selection: every option is
/// flagged `selected` (the current pick) and `active` (still selectable,
/// i.e. selected or reachable through some valid combination), and media is
/// attached for picture-type configurators.
pub struct AnnotatingConfiguratorService<S, G> {
    decorated: S,
    gateway: G,
}

impl<S, G> AnnotatingConfiguratorService<S, G>
where
    S: ConfiguratorService,
    G: SelectionAwareGateway,
{
    pub fn new(decorated: S, gateway: G) -> Self {
        Self { decorated, gateway }
    }
}

#[async_trait::async_trait]
impl<S, G> ConfiguratorService for AnnotatingConfiguratorService<S, G>
where
    S: ConfiguratorService,
    G: SelectionAwareGateway,
{
    async fn product_configuration(
        &self,
        product: &Product,
        context: &ShopContext,
    ) -> Result<Vec<Group>> {
        self.decorated.product_configuration(product, context).await
    }

    async fn products_configurations(
        &self,
        products: &[Product],
        context: &ShopContext,
    ) -> Result<HashMap<ProductId, Vec<Group>>> {
        self.decorated
            .products_configurations(products, context)
            .await
    }

    async fn product_configurator(
        &self,
        product: &Product,
        context: &ShopContext,
        selection: &Selection,
    ) -> Result<Configurator> {
        let mut configurator = self.gateway.get(product, context).await?;
        let combinations = self
            .gateway
            .product_combinations_by_selection(product, selection)
            .await?;

        let media = if configurator.configurator_type == ConfiguratorType::Picture {
            self.gateway.configurator_media(product, context).await?
        } else {
            HashMap::new()
        };

        for group in &mut configurator.groups {
            group.selected = selection.contains_key(&group.id);

            for option in &mut group.options {
                option.selected = selection.values().any(|&chosen| chosen == option.id);
                option.active = option.selected
                    || Configurator::option_in_combinations(group.id, option.id, &combinations);

                if let Some(media) = media.get(&option.id) {
                    option.media = Some(media.clone());
                }
            }
        }

        Ok(configurator)
    }
}

/// Minimal base implementation of [`ConfiguratorService`] on top of a
/// gateway: returns the configurator tree without any annotation. Serves as
/// the delegate the annotating decorator wraps.
pub struct CoreConfiguratorService<G> {
    gateway: G,
}

impl<G> CoreConfiguratorService<G>
where
    G: ConfiguratorGateway,
{
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }
}

#[async_trait::async_trait]
impl<G> ConfiguratorService for CoreConfiguratorService<G>
where
    G: ConfiguratorGateway,
{
    async fn product_configuration(
        &self,
        product: &Product,
        context: &ShopContext,
    ) -> Result<Vec<Group>> {
        let configurator = self.gateway.get(product, context).await?;
        Ok(configurator.groups)
    }

    async fn products_configurations(
        &self,
        products: &[Product],
        context: &ShopContext,
    ) -> Result<HashMap<ProductId, Vec<Group>>> {
        let mut configurations = HashMap::new();
        for product in products {
            let configurator = self.gateway.get(product, context).await?;
            configurations.insert(product.id, configurator.groups);
        }
        Ok(configurations)
    }

    async fn product_configurator(
        &self,
        product: &Product,
        context: &ShopContext,
        _selection: &Selection,
    ) -> Result<Configurator> {
        self.gateway.get(product, context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreSettings;
    use crate::logic::CombinationGateway;
    use crate::model::Media;
    use crate::store::MemoryCatalog;

    fn shirt_catalog(configurator_type: ConfiguratorType) -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.add_set(1, configurator_type);
        catalog.add_product(100, 1);
        catalog.add_group(1, 10, "Color", 1);
        catalog.add_group(1, 20, "Size", 2);
        catalog.add_option(1, 10, 11, "Red", 1);
        catalog.add_option(1, 10, 12, "Blue", 2);
        catalog.add_option(1, 20, 21, "S", 1);
        catalog.add_option(1, 20, 22, "M", 2);
        catalog.add_variant(100, 1000, "SHIRT-RED-S", true, vec![11, 21], 5, 1, true);
        catalog.add_variant(100, 1001, "SHIRT-BLUE-M", true, vec![12, 22], 5, 1, true);
        catalog
    }

    fn service(
        catalog: MemoryCatalog,
    ) -> AnnotatingConfiguratorService<
        CoreConfiguratorService<MemoryCatalog>,
        CombinationGateway<MemoryCatalog, MemoryCatalog>,
    > {
        let gateway = CombinationGateway::new(
            catalog.clone(),
            catalog.clone(),
            StoreSettings {
                hide_no_instock: false,
            },
        );
        AnnotatingConfiguratorService::new(CoreConfiguratorService::new(catalog), gateway)
    }

    fn selection(entries: &[(i64, i64)]) -> Selection {
        entries.iter().copied().collect()
    }

    fn option<'a>(configurator: &'a Configurator, group_id: i64, option_id: i64) -> &'a crate::model::ConfiguratorOption {
        configurator
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .unwrap()
            .options
            .iter()
            .find(|o| o.id == option_id)
            .unwrap()
    }

    #[tokio::test]
    async fn selected_options_are_always_active() {
        let service = service(shirt_catalog(ConfiguratorType::Standard));
        let configurator = service
            .product_configurator(
                &Product::new(100),
                &ShopContext::new(1),
                &selection(&[(10, 11), (20, 22)]),
            )
            .await
            .unwrap();

        for group in &configurator.groups {
            for option in &group.options {
                if option.selected {
                    assert!(option.active, "selected option {} not active", option.id);
                }
            }
        }
    }

    #[tokio::test]
    async fn unbuildable_selection_still_returns_annotated_tree() {
        let service = service(shirt_catalog(ConfiguratorType::Standard));
        // (Red, M): no such variant
        let configurator = service
            .product_configurator(
                &Product::new(100),
                &ShopContext::new(1),
                &selection(&[(10, 11), (20, 22)]),
            )
            .await
            .unwrap();

        let size_m = option(&configurator, 20, 22);
        assert!(size_m.selected);
        // Selected options stay active even without a matching variant
        assert!(size_m.active);

        // Swapping Size M -> S reaches the (Red, S) variant, so S is listed
        // in a combination and becomes active without being selected
        let size_s = option(&configurator, 20, 21);
        assert!(!size_s.selected);
        assert!(size_s.active);
    }

    #[tokio::test]
    async fn single_color_pick_activates_buildable_size_only() {
        let service = service(shirt_catalog(ConfiguratorType::Standard));
        let configurator = service
            .product_configurator(
                &Product::new(100),
                &ShopContext::new(1),
                &selection(&[(10, 11)]),
            )
            .await
            .unwrap();

        let color = configurator.groups.iter().find(|g| g.id == 10).unwrap();
        assert!(color.selected);
        let size = configurator.groups.iter().find(|g| g.id == 20).unwrap();
        assert!(!size.selected);

        assert!(option(&configurator, 10, 11).active);
        // Blue alone matches the (Blue, M) variant
        assert!(option(&configurator, 10, 12).active);
        // Only S combines with Red
        assert!(option(&configurator, 20, 21).active);
        assert!(!option(&configurator, 20, 22).active);
    }

    #[tokio::test]
    async fn media_attached_for_picture_configurators_only() {
        let mut catalog = shirt_catalog(ConfiguratorType::Picture);
        catalog.add_media(
            11,
            Media {
                id: 7,
                file_name: "red-swatch.jpg".to_string(),
            },
        );
        let service = service(catalog.clone());

        let configurator = service
            .product_configurator(&Product::new(100), &ShopContext::new(1), &Selection::new())
            .await
            .unwrap();
        assert_eq!(
            option(&configurator, 10, 11).media.as_ref().unwrap().file_name,
            "red-swatch.jpg"
        );
        assert!(option(&configurator, 10, 12).media.is_none());

        // Same catalog with a standard set: media stays untouched
        let mut standard = shirt_catalog(ConfiguratorType::Standard);
        standard.add_media(
            11,
            Media {
                id: 7,
                file_name: "red-swatch.jpg".to_string(),
            },
        );
        let service = self::service(standard);
        let configurator = service
            .product_configurator(&Product::new(100), &ShopContext::new(1), &Selection::new())
            .await
            .unwrap();
        assert!(option(&configurator, 10, 11).media.is_none());
    }

    #[tokio::test]
    async fn configuration_calls_pass_through_to_decorated_service() {
        let catalog = shirt_catalog(ConfiguratorType::Standard);
        let service = service(catalog.clone());
        let base = CoreConfiguratorService::new(catalog);
        let product = Product::new(100);
        let context = ShopContext::new(1);

        let through = service
            .product_configuration(&product, &context)
            .await
            .unwrap();
        let direct = base.product_configuration(&product, &context).await.unwrap();
        assert_eq!(through, direct);

        let batch = service
            .products_configurations(&[product], &context)
            .await
            .unwrap();
        assert_eq!(batch.get(&100), Some(&direct));
    }
}
