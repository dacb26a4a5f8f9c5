pub mod error;
pub mod query;
pub mod repository;
pub mod store;
pub mod user_options;

pub use error::{Result, StoreError};
pub use query::{
    ListingPage, ListingQuery, OrderBy, SortDirection, field_column_slug, parse_field_column_slug,
    run_query,
};
pub use repository::FormRepository;
pub use store::SubmissionStore;
pub use user_options::{UserId, UserOptionsStore};
