pub mod builder;
pub mod executor;
pub mod filter;
pub mod sort;

pub use builder::QueryBuilder;
pub use executor::SearchExecutor;
pub use filter::{parse_filters, parse_query_pairs};
pub use sort::SortResolver;
