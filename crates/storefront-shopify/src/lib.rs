pub mod client;
pub mod connection;
pub mod error;
pub mod filters;
pub mod pagination;
pub mod params;
pub mod queries;
pub(crate) mod rate_limit;
pub mod reshape;
pub mod types;

pub use client::{
    AddressInput, CartLineInput, CartLineUpdateInput, Credentials, ListingQuery, NewCustomer,
    ProductsPage, StorefrontClient,
};
pub use connection::{collect_nodes, remove_edges_and_nodes};
pub use error::StorefrontError;
pub use filters::{
    parse_filters, ApiFilterPredicate, FilterDescriptor, FilterType, FilterValue, InputError,
    PriceRange,
};
pub use pagination::{PageWindow, PAGE_SIZE};
pub use params::{build_param_update, create_url, Cursor, QueryParams, SortOrder};
pub use types::{Connection, Edge, PageInfo};
