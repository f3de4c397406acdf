use std::collections::{BTreeMap, HashMap};

use anyhow::Result;

use crate::model::{
    AlternatePair, CombinationRow, Configurator, ConfiguratorOption, ConfiguratorType, Group,
    GroupId, Media, OptionId, Product, ProductId, Selection, SetId, ShopContext, VariantId,
    VariantMatch,
};
use crate::store::traits::{ConfiguratorGateway, ConfiguratorSource};

#[derive(Debug, Clone)]
struct GroupRecord {
    name: String,
    position: i32,
}

#[derive(Debug, Clone)]
struct OptionRecord {
    group_id: GroupId,
    name: String,
    position: i32,
}

#[derive(Debug, Clone)]
struct VariantRecord {
    product_id: ProductId,
    order_number: String,
    active: bool,
    in_stock: i64,
    min_purchase: i64,
    last_stock: bool,
    options: Vec<OptionId>,
}

/// In-memory catalog with the same query semantics as [`PostgresCatalog`]
/// (same ordering, same exact-coverage grouping). Used by tests, seed data
/// and demos; never by production storefronts.
///
/// [`PostgresCatalog`]: crate::store::PostgresCatalog
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: HashMap<ProductId, SetId>,
    set_types: HashMap<SetId, ConfiguratorType>,
    groups: BTreeMap<GroupId, GroupRecord>,
    options: BTreeMap<OptionId, OptionRecord>,
    set_groups: Vec<(SetId, GroupId)>,
    set_options: Vec<(SetId, OptionId)>,
    variants: BTreeMap<VariantId, VariantRecord>,
    media: HashMap<OptionId, Media>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_set(&mut self, set_id: SetId, configurator_type: ConfiguratorType) {
        self.set_types.insert(set_id, configurator_type);
    }

    pub fn add_product(&mut self, product_id: ProductId, set_id: SetId) {
        self.products.insert(product_id, set_id);
    }

    pub fn add_group(&mut self, set_id: SetId, group_id: GroupId, name: &str, position: i32) {
        self.groups.insert(
            group_id,
            GroupRecord {
                name: name.to_string(),
                position,
            },
        );
        self.set_groups.push((set_id, group_id));
    }

    pub fn add_option(
        &mut self,
        set_id: SetId,
        group_id: GroupId,
        option_id: OptionId,
        name: &str,
        position: i32,
    ) {
        self.options.insert(
            option_id,
            OptionRecord {
                group_id,
                name: name.to_string(),
                position,
            },
        );
        self.set_options.push((set_id, option_id));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_variant(
        &mut self,
        product_id: ProductId,
        variant_id: VariantId,
        order_number: &str,
        active: bool,
        options: Vec<OptionId>,
        in_stock: i64,
        min_purchase: i64,
        last_stock: bool,
    ) {
        self.variants.insert(
            variant_id,
            VariantRecord {
                product_id,
                order_number: order_number.to_string(),
                active,
                in_stock,
                min_purchase,
                last_stock,
                options,
            },
        );
    }

    pub fn set_variant_stock(&mut self, variant_id: VariantId, in_stock: i64) {
        if let Some(variant) = self.variants.get_mut(&variant_id) {
            variant.in_stock = in_stock;
        }
    }

    pub fn add_media(&mut self, option_id: OptionId, media: Media) {
        self.media.insert(option_id, media);
    }

    fn set_of(&self, product: &Product) -> Option<SetId> {
        self.products.get(&product.id).copied()
    }

    fn groups_in_set(&self, set_id: SetId) -> Vec<GroupId> {
        self.set_groups
            .iter()
            .filter(|(sid, _)| *sid == set_id)
            .map(|(_, gid)| *gid)
            .collect()
    }

    fn options_in_set(&self, set_id: SetId) -> Vec<OptionId> {
        self.set_options
            .iter()
            .filter(|(sid, _)| *sid == set_id)
            .map(|(_, oid)| *oid)
            .collect()
    }
}

#[async_trait::async_trait]
impl ConfiguratorSource for MemoryCatalog {
    async fn alternate_pairs(
        &self,
        product: &Product,
        current_selection: &Selection,
    ) -> Result<Vec<AlternatePair>> {
        let Some(set_id) = self.set_of(product) else {
            return Ok(Vec::new());
        };

        let group_ids = self.groups_in_set(set_id);
        let option_ids = self.options_in_set(set_id);

        // The join chain only produces rows when at least one candidate
        // option survives the selection filter; with a selection that means
        // some selected option is actually assigned to the product's set.
        let has_candidate = option_ids.iter().any(|oid| {
            let Some(option) = self.options.get(oid) else {
                return false;
            };
            group_ids.contains(&option.group_id)
                && (current_selection.is_empty()
                    || current_selection.values().any(|selected| selected == oid))
        });
        if !has_candidate {
            return Ok(Vec::new());
        }

        let mut pairs: Vec<AlternatePair> = Vec::new();
        for &group_id in &group_ids {
            for &option_id in &option_ids {
                let Some(option) = self.options.get(&option_id) else {
                    continue;
                };
                if option.group_id != group_id {
                    continue;
                }
                if !current_selection.is_empty()
                    && current_selection.values().any(|selected| *selected == option_id)
                {
                    continue;
                }
                pairs.push(AlternatePair { group_id, option_id });
            }
        }

        pairs.sort_by_key(|pair| (pair.group_id, pair.option_id));
        pairs.dedup();
        Ok(pairs)
    }

    async fn variant_matches(
        &self,
        product: &Product,
        selection: &Selection,
    ) -> Result<Vec<VariantMatch>> {
        if selection.is_empty() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for (&variant_id, variant) in &self.variants {
            if variant.product_id != product.id || !variant.active {
                continue;
            }
            let relation_count = variant
                .options
                .iter()
                .filter(|oid| selection.values().any(|selected| selected == *oid))
                .count() as i64;
            if relation_count == selection.len() as i64 {
                matches.push(VariantMatch {
                    variant_id,
                    relation_count,
                    last_stock: variant.last_stock,
                    in_stock: variant.in_stock,
                    min_purchase: variant.min_purchase,
                });
            }
        }

        Ok(matches)
    }
}

#[async_trait::async_trait]
impl ConfiguratorGateway for MemoryCatalog {
    async fn get(&self, product: &Product, _context: &ShopContext) -> Result<Configurator> {
        let Some(set_id) = self.set_of(product) else {
            return Ok(Configurator::new(ConfiguratorType::Standard, Vec::new()));
        };

        let configurator_type = self
            .set_types
            .get(&set_id)
            .copied()
            .unwrap_or(ConfiguratorType::Standard);

        let option_ids = self.options_in_set(set_id);

        let mut groups: Vec<Group> = Vec::new();
        for group_id in self.groups_in_set(set_id) {
            let Some(record) = self.groups.get(&group_id) else {
                continue;
            };

            let mut options: Vec<ConfiguratorOption> = option_ids
                .iter()
                .filter_map(|oid| {
                    let option = self.options.get(oid)?;
                    (option.group_id == group_id).then(|| {
                        ConfiguratorOption::new(*oid, group_id, option.name.clone(), option.position)
                    })
                })
                .collect();
            options.sort_by(|a, b| (a.position, &a.name).cmp(&(b.position, &b.name)));
            groups.push(
                Group::new(group_id, record.name.clone(), record.position).with_options(options),
            );
        }
        groups.sort_by(|a, b| (a.position, &a.name).cmp(&(b.position, &b.name)));

        Ok(Configurator::new(configurator_type, groups))
    }

    async fn configurator_media(
        &self,
        product: &Product,
        _context: &ShopContext,
    ) -> Result<HashMap<OptionId, Media>> {
        let Some(set_id) = self.set_of(product) else {
            return Ok(HashMap::new());
        };

        let option_ids = self.options_in_set(set_id);
        Ok(self
            .media
            .iter()
            .filter(|(oid, _)| option_ids.contains(oid))
            .map(|(oid, media)| (*oid, media.clone()))
            .collect())
    }

    async fn product_combinations(&self, product: &Product) -> Result<Vec<CombinationRow>> {
        let mut by_option: BTreeMap<OptionId, Vec<String>> = BTreeMap::new();
        for variant in self.variants.values() {
            if variant.product_id != product.id || !variant.active {
                continue;
            }
            for &option_id in &variant.options {
                by_option
                    .entry(option_id)
                    .or_default()
                    .push(variant.order_number.clone());
            }
        }

        Ok(by_option
            .into_iter()
            .map(|(option_id, mut variant_numbers)| {
                variant_numbers.sort();
                CombinationRow {
                    option_id,
                    variant_numbers,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        catalog.add_set(1, ConfiguratorType::Standard);
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

    #[tokio::test]
    async fn alternate_pairs_without_selection_lists_full_cross_product() {
        let catalog = catalog();
        let pairs = catalog
            .alternate_pairs(&Product::new(100), &Selection::new())
            .await
            .unwrap();

        let listed: Vec<(i64, i64)> = pairs.iter().map(|p| (p.group_id, p.option_id)).collect();
        assert_eq!(listed, vec![(10, 11), (10, 12), (20, 21), (20, 22)]);
    }

    #[tokio::test]
    async fn alternate_pairs_excludes_selected_options() {
        let catalog = catalog();
        let mut selection = Selection::new();
        selection.insert(10, 11);

        let pairs = catalog
            .alternate_pairs(&Product::new(100), &selection)
            .await
            .unwrap();
        let listed: Vec<(i64, i64)> = pairs.iter().map(|p| (p.group_id, p.option_id)).collect();
        assert_eq!(listed, vec![(10, 12), (20, 21), (20, 22)]);
    }

    #[tokio::test]
    async fn alternate_pairs_with_foreign_selection_is_empty() {
        let catalog = catalog();
        let mut selection = Selection::new();
        selection.insert(99, 999);

        let pairs = catalog
            .alternate_pairs(&Product::new(100), &selection)
            .await
            .unwrap();
        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn variant_matches_requires_exact_coverage() {
        let catalog = catalog();
        let product = Product::new(100);

        let mut partial = Selection::new();
        partial.insert(10, 11);
        let matches = catalog.variant_matches(&product, &partial).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].variant_id, 1000);
        assert_eq!(matches[0].relation_count, 1);

        let mut full = Selection::new();
        full.insert(10, 11);
        full.insert(20, 21);
        let matches = catalog.variant_matches(&product, &full).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].relation_count, 2);

        // Cross combination with no variant
        let mut mixed = Selection::new();
        mixed.insert(10, 11);
        mixed.insert(20, 22);
        let matches = catalog.variant_matches(&product, &mixed).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn variant_matches_skips_inactive_variants() {
        let mut catalog = catalog();
        catalog.add_variant(100, 1002, "SHIRT-RED-M", false, vec![11, 22], 5, 1, true);

        let mut selection = Selection::new();
        selection.insert(10, 11);
        selection.insert(20, 22);
        let matches = catalog
            .variant_matches(&Product::new(100), &selection)
            .await
            .unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn product_combinations_lists_active_variant_numbers_per_option() {
        let catalog = catalog();
        let rows = catalog
            .product_combinations(&Product::new(100))
            .await
            .unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].option_id, 11);
        assert_eq!(rows[0].variant_numbers, vec!["SHIRT-RED-S".to_string()]);
    }
}
