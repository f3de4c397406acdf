use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool, Row};

use crate::model::{
    selection_option_ids, AlternatePair, CombinationRow, Configurator, ConfiguratorOption,
    ConfiguratorType, Group, Media, OptionId, Product, Selection, ShopContext, VariantMatch,
};
use crate::store::traits::{ConfiguratorGateway, ConfiguratorSource};

/// Read-only PostgreSQL catalog backing both the base gateway and the
/// combination queries. All access goes through a shared connection pool;
/// no writes are issued by this crate.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Create a new catalog with the given database URL
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .connect(database_url)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl ConfiguratorSource for PostgresCatalog {
    async fn alternate_pairs(
        &self,
        product: &Product,
        current_selection: &Selection,
    ) -> Result<Vec<AlternatePair>> {
        // Two independent join paths through the set relations generate the
        // cross product of (group, option) pairs assignable within the
        // product's configurator set; the selection filter is applied on top
        // rather than inside the join chain.
        let mut sql = String::from(
            r#"
            SELECT other_group.id AS group_id, included_option.id AS option_id
            FROM configurator_sets AS configurator_set
            INNER JOIN products
                ON products.configurator_set_id = configurator_set.id
            INNER JOIN set_group_relations AS group_relation
                ON group_relation.set_id = configurator_set.id
            INNER JOIN configurator_groups AS configurator_group
                ON configurator_group.id = group_relation.group_id
            INNER JOIN set_option_relations AS option_relation
                ON option_relation.set_id = configurator_set.id
            INNER JOIN configurator_options AS configurator_option
                ON configurator_option.id = option_relation.option_id
                AND configurator_option.group_id = configurator_group.id
            INNER JOIN set_group_relations AS other_group_relation
                ON other_group_relation.set_id = configurator_set.id
            INNER JOIN configurator_groups AS other_group
                ON other_group.id = other_group_relation.group_id
            INNER JOIN set_option_relations AS included_option_relation
                ON included_option_relation.set_id = group_relation.set_id
            INNER JOIN configurator_options AS included_option
                ON included_option.id = included_option_relation.option_id
            WHERE products.id = $1
                AND included_option.group_id = other_group.id
            "#,
        );

        if !current_selection.is_empty() {
            sql.push_str(
                r#"
                AND configurator_option.id = ANY($2)
                AND NOT (included_option.id = ANY($2))
                "#,
            );
        }

        sql.push_str(
            r#"
            GROUP BY other_group.id, included_option.id
            ORDER BY other_group.id, included_option.id
            "#,
        );

        let mut query = sqlx::query(&sql).bind(product.id);
        if !current_selection.is_empty() {
            query = query.bind(selection_option_ids(current_selection));
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .context("Failed to fetch alternate group/option pairs")?;

        Ok(rows
            .into_iter()
            .map(|row| AlternatePair {
                group_id: row.get("group_id"),
                option_id: row.get("option_id"),
            })
            .collect())
    }

    async fn variant_matches(
        &self,
        product: &Product,
        selection: &Selection,
    ) -> Result<Vec<VariantMatch>> {
        let rows = sqlx::query(
            r#"
            SELECT variants.id AS variant_id,
                   COUNT(*) AS relation_count,
                   variants.last_stock AS last_stock,
                   variants.in_stock AS in_stock,
                   variants.min_purchase AS min_purchase
            FROM product_variants AS variants
            INNER JOIN variant_option_relations AS relation
                ON relation.variant_id = variants.id
            WHERE variants.product_id = $1
                AND variants.active
                AND relation.option_id = ANY($2)
            GROUP BY variants.id, variants.last_stock, variants.in_stock, variants.min_purchase
            HAVING COUNT(*) = $3
            ORDER BY variants.id
            "#,
        )
        .bind(product.id)
        .bind(selection_option_ids(selection))
        .bind(selection.len() as i64)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch variant matches")?;

        Ok(rows
            .into_iter()
            .map(|row| VariantMatch {
                variant_id: row.get("variant_id"),
                relation_count: row.get("relation_count"),
                last_stock: row.get("last_stock"),
                in_stock: row.get("in_stock"),
                min_purchase: row.get("min_purchase"),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ConfiguratorGateway for PostgresCatalog {
    async fn get(&self, product: &Product, _context: &ShopContext) -> Result<Configurator> {
        let type_row = sqlx::query(
            r#"
            SELECT configurator_set.type AS set_type
            FROM configurator_sets AS configurator_set
            INNER JOIN products ON products.configurator_set_id = configurator_set.id
            WHERE products.id = $1
            "#,
        )
        .bind(product.id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch configurator set")?;

        let configurator_type = type_row
            .map(|row| ConfiguratorType::from_store(row.get("set_type")))
            .unwrap_or(ConfiguratorType::Standard);

        let rows = sqlx::query(
            r#"
            SELECT configurator_group.id AS group_id,
                   configurator_group.name AS group_name,
                   configurator_group.position AS group_position,
                   configurator_option.id AS option_id,
                   configurator_option.name AS option_name,
                   configurator_option.position AS option_position
            FROM configurator_sets AS configurator_set
            INNER JOIN products
                ON products.configurator_set_id = configurator_set.id
            INNER JOIN set_group_relations AS group_relation
                ON group_relation.set_id = configurator_set.id
            INNER JOIN configurator_groups AS configurator_group
                ON configurator_group.id = group_relation.group_id
            INNER JOIN set_option_relations AS option_relation
                ON option_relation.set_id = configurator_set.id
            INNER JOIN configurator_options AS configurator_option
                ON configurator_option.id = option_relation.option_id
                AND configurator_option.group_id = configurator_group.id
            WHERE products.id = $1
            ORDER BY configurator_group.position, configurator_group.name,
                     configurator_option.position, configurator_option.name
            "#,
        )
        .bind(product.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch configurator groups")?;

        let mut groups: Vec<Group> = Vec::new();
        for row in rows {
            let group_id: i64 = row.get("group_id");
            if groups.last().map(|group| group.id) != Some(group_id) {
                groups.push(Group::new(
                    group_id,
                    row.get::<String, _>("group_name"),
                    row.get("group_position"),
                ));
            }
            if let Some(group) = groups.last_mut() {
                group.options.push(ConfiguratorOption::new(
                    row.get("option_id"),
                    group_id,
                    row.get::<String, _>("option_name"),
                    row.get("option_position"),
                ));
            }
        }

        Ok(Configurator::new(configurator_type, groups))
    }

    async fn configurator_media(
        &self,
        product: &Product,
        _context: &ShopContext,
    ) -> Result<HashMap<OptionId, Media>> {
        let rows = sqlx::query(
            r#"
            SELECT option_media.option_id AS option_id,
                   option_media.media_id AS media_id,
                   option_media.file_name AS file_name
            FROM option_media
            INNER JOIN set_option_relations AS option_relation
                ON option_relation.option_id = option_media.option_id
            INNER JOIN products
                ON products.configurator_set_id = option_relation.set_id
            WHERE products.id = $1
            ORDER BY option_media.option_id
            "#,
        )
        .bind(product.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch configurator media")?;

        let mut media = HashMap::new();
        for row in rows {
            media.insert(
                row.get::<i64, _>("option_id"),
                Media {
                    id: row.get("media_id"),
                    file_name: row.get("file_name"),
                },
            );
        }

        Ok(media)
    }

    async fn product_combinations(&self, product: &Product) -> Result<Vec<CombinationRow>> {
        let rows = sqlx::query(
            r#"
            SELECT relation.option_id AS option_id,
                   ARRAY_AGG(variants.order_number ORDER BY variants.order_number) AS variant_numbers
            FROM variant_option_relations AS relation
            INNER JOIN product_variants AS variants
                ON variants.id = relation.variant_id
            WHERE variants.product_id = $1
                AND variants.active
            GROUP BY relation.option_id
            ORDER BY relation.option_id
            "#,
        )
        .bind(product.id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch product combinations")?;

        Ok(rows
            .into_iter()
            .map(|row| CombinationRow {
                option_id: row.get("option_id"),
                variant_numbers: row.get("variant_numbers"),
            })
            .collect())
    }
}
