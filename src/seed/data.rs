use crate::model::{ConfiguratorType, Media};
use crate::store::MemoryCatalog;

/// Product id of the demo shirt.
pub const SHIRT_PRODUCT: i64 = 100;

/// Demo catalog used by the integration tests and examples: one shirt with
/// Color {Red, Blue} and Size {S, M}, purchasable as (Red, S) and (Blue, M).
pub fn demo_catalog() -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new();

    catalog.add_set(1, ConfiguratorType::Picture);
    catalog.add_product(SHIRT_PRODUCT, 1);

    catalog.add_group(1, 10, "Color", 1);
    catalog.add_group(1, 20, "Size", 2);

    catalog.add_option(1, 10, 11, "Red", 1);
    catalog.add_option(1, 10, 12, "Blue", 2);
    catalog.add_option(1, 20, 21, "S", 1);
    catalog.add_option(1, 20, 22, "M", 2);

    catalog.add_variant(
        SHIRT_PRODUCT,
        1000,
        "SHIRT-RED-S",
        true,
        vec![11, 21],
        5,
        1,
        true,
    );
    catalog.add_variant(
        SHIRT_PRODUCT,
        1001,
        "SHIRT-BLUE-M",
        true,
        vec![12, 22],
        8,
        1,
        true,
    );

    catalog.add_media(
        11,
        Media {
            id: 1,
            file_name: "swatch-red.jpg".to_string(),
        },
    );
    catalog.add_media(
        12,
        Media {
            id: 2,
            file_name: "swatch-blue.jpg".to_string(),
        },
    );

    catalog
}
