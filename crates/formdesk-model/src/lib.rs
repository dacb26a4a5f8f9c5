pub mod action;
pub mod error;
pub mod field;
pub mod form;
pub mod ident;
pub mod submission;

pub use action::{Action, ActionSettings};
pub use error::{ModelError, Result};
pub use field::{EditorKind, Field, FieldSettings, FieldType, MAX_LABEL_LEN, OptionRow,
    truncate_chars};
pub use form::{Form, FormSettings};
pub use ident::{EntityId, EntityRef};
pub use submission::{FieldValue, Submission, SubmissionStatus};
