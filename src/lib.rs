pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export logic types
pub use logic::{AnnotatingConfiguratorService, CombinationGateway, CoreConfiguratorService};

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{
    ConfiguratorGateway, ConfiguratorService, ConfiguratorSource, MemoryCatalog, PostgresCatalog,
    SelectionAwareGateway,
};

pub use config::{AppConfig, StoreSettings};
