//! Resumable batch deletion of a form's submissions.
//!
//! The job spans multiple requests: the loading step sizes the work and
//! records an export filename, each following step deletes one page of
//! submissions, and progress is persisted to user options between steps
//! so a retried request never redeletes prior items.
//!
//! Progress is keyed by the acting user, not by job. Two jobs driven
//! concurrently by the same user will clobber each other's processed
//! list; this matches the behavior being ported and is intentionally
//! left unfixed.

use tracing::{debug, info};

use formdesk_model::EntityId;
use formdesk_store::{SubmissionStore, UserId, UserOptionsStore};

use crate::error::Result;

/// Submissions deleted per step.
pub const PAGE_SIZE: usize = 250;
/// Steps added on top of the paged work (loading + completion slack).
const STEP_OVERHEAD: u32 = 2;

const PROCESSED_IDS_KEY: &str = "delete_subs_ids";
const FILENAME_KEY: &str = "delete_subs_filename";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingReport {
    /// True when there is nothing to do (no form selected).
    pub complete: bool,
    pub total_steps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Ids deleted by this step.
    pub deleted: Vec<EntityId>,
}

#[derive(Debug, Clone)]
pub struct DeleteSubmissionsJob {
    form_id: EntityId,
    user: UserId,
    filename: String,
    redirect: String,
    total_steps: u32,
    /// Redirect target announced by the loading step.
    pub redirect_target: Option<String>,
}

impl DeleteSubmissionsJob {
    pub fn new(
        form_id: EntityId,
        user: UserId,
        filename: impl Into<String>,
        redirect: impl Into<String>,
    ) -> Self {
        Self {
            form_id,
            user,
            filename: filename.into(),
            redirect: redirect.into(),
            total_steps: 0,
            redirect_target: None,
        }
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    /// Size the job and record the output filename and redirect target.
    pub fn loading(
        &mut self,
        store: &SubmissionStore,
        options: &UserOptionsStore,
    ) -> Result<LoadingReport> {
        if self.form_id == 0 {
            return Ok(LoadingReport {
                complete: true,
                total_steps: 0,
            });
        }
        let count = store.for_form(self.form_id).count();
        if self.total_steps <= 1 {
            self.total_steps = (count as f64 / PAGE_SIZE as f64).round() as u32 + STEP_OVERHEAD;
        }
        options.set(self.user, FILENAME_KEY, &self.filename)?;
        self.redirect_target = Some(append_query(
            &self.redirect,
            "download_all",
            &self.filename,
        ));
        info!(
            form_id = self.form_id,
            submissions = count,
            total_steps = self.total_steps,
            "delete job sized"
        );
        Ok(LoadingReport {
            complete: false,
            total_steps: self.total_steps,
        })
    }

    /// Delete the next page of submissions. Every deleted id is appended
    /// to the durable processed list before an error can surface, so a
    /// failing item later in the page never causes redeletion of earlier
    /// ones on retry. An empty page is steady-state completion, not an
    /// error.
    pub fn step(
        &mut self,
        store: &mut SubmissionStore,
        options: &UserOptionsStore,
    ) -> Result<StepReport> {
        let mut processed: Vec<EntityId> = options
            .get(self.user, PROCESSED_IDS_KEY)?
            .unwrap_or_default();

        let page = store.next_page(self.form_id, PAGE_SIZE);
        let mut deleted = Vec::with_capacity(page.len());
        for id in page {
            let result = store.delete(id);
            if result.is_ok() {
                if !processed.contains(&id) {
                    processed.push(id);
                }
                deleted.push(id);
            }
            if let Err(error) = result {
                options.set(self.user, PROCESSED_IDS_KEY, &processed)?;
                return Err(error.into());
            }
        }
        options.set(self.user, PROCESSED_IDS_KEY, &processed)?;
        debug!(
            form_id = self.form_id,
            deleted = deleted.len(),
            "delete job step"
        );
        Ok(StepReport { deleted })
    }

    /// Clear the durable progress once all steps have run.
    pub fn complete(&self, options: &UserOptionsStore) -> Result<()> {
        options.remove(self.user, PROCESSED_IDS_KEY)?;
        options.remove(self.user, FILENAME_KEY)?;
        info!(form_id = self.form_id, "delete job complete");
        Ok(())
    }

    /// Durable processed-id list, for drivers and tests.
    pub fn processed_ids(&self, options: &UserOptionsStore) -> Result<Vec<EntityId>> {
        Ok(options
            .get(self.user, PROCESSED_IDS_KEY)?
            .unwrap_or_default())
    }

    /// Recorded output filename, if the loading step has run.
    pub fn stored_filename(&self, options: &UserOptionsStore) -> Result<Option<String>> {
        options.get(self.user, FILENAME_KEY).map_err(Into::into)
    }
}

fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{key}={value}")
}
