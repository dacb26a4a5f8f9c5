pub mod columns;
pub mod delete_job;
pub mod detail;
pub mod endpoints;
pub mod error;
pub mod events;
pub mod listing;
pub mod options_view;
pub mod router;
pub mod session;

pub use columns::{Column, ColumnSet, hidden_columns_key};
pub use delete_job::{DeleteSubmissionsJob, LoadingReport, PAGE_SIZE, StepReport};
pub use detail::{DetailRow, SaveOutcome, StatsPanel, editor_rows, save, stats_panel};
pub use endpoints::{NewIds, SaveEntity, SaveFormPayload, preview_key};
pub use error::{AdminError, Result};
pub use events::{EventBus, OptionsEvent, OptionsListener};
pub use listing::{
    BulkAction, Cell, CellContent, DateCell, ExportTrigger, ListingController, ListingRows,
    MAX_CELL_ITEMS, PostCounts, Row, RowAction, bulk_actions, parse_export_trigger, post_counts,
    row_actions,
};
pub use options_view::OptionsListView;
pub use router::{AdminContext, AdminRouter, AjaxRequest, AjaxResponse};
pub use session::{Principal, SecurityToken};
