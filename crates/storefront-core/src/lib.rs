pub mod app_config;
pub mod cart;
pub mod cart_state;
pub mod catalog;
pub mod config;
pub mod content;
pub mod customer;

pub use app_config::{AppConfig, Environment};
pub use cart::{Cart, CartCost, CartLine, CartLineCost, CartMerchandise, CartProduct};
pub use cart_state::CartState;
pub use catalog::{
    Collection, Image, Money, Product, ProductMeta, ProductOption, ProductVariant, SaleInfo,
    SelectedOption, Seo, ShopColors, ShopInfo,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{MenuItem, Metaobject, MetaobjectField, Page};
pub use customer::{
    Customer, CustomerAccessToken, CustomerProfile, MailingAddress, Order, OrderLineItem,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
