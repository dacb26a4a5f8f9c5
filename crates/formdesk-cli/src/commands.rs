//! Command implementations over the on-disk workspace.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use indicatif::ProgressBar;
use tracing::info;

use formdesk_admin::{DeleteSubmissionsJob, ListingController, ListingRows, post_counts};
use formdesk_export::{SubmissionCsvExporter, download_filename};
use formdesk_model::Form;
use formdesk_store::{
    FormRepository, ListingQuery, OrderBy, SortDirection, SubmissionStore, UserOptionsStore,
};

use crate::cli::{ExportArgs, ListArgs, PurgeArgs};

/// The CLI's view of the data directory: forms, a submissions snapshot,
/// and per-user options.
pub struct Workspace {
    pub forms: FormRepository,
    pub submissions: SubmissionStore,
    pub options: UserOptionsStore,
    snapshot_path: PathBuf,
}

impl Workspace {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let forms = FormRepository::new(data_dir.join("forms"))?;
        let options = UserOptionsStore::new(data_dir.join("user-options"))?;
        let snapshot_path = data_dir.join("submissions.json");
        let submissions = SubmissionStore::load_snapshot(&snapshot_path)
            .with_context(|| format!("Failed to load {}", snapshot_path.display()))?;
        Ok(Self {
            forms,
            submissions,
            options,
            snapshot_path,
        })
    }

    pub fn persist(&self) -> Result<()> {
        self.submissions
            .save_snapshot(&self.snapshot_path)
            .with_context(|| format!("Failed to write {}", self.snapshot_path.display()))
    }

    fn form(&self, form_id: u64) -> Result<Form> {
        self.forms
            .load(form_id)?
            .with_context(|| format!("No stored form with id {form_id}"))
    }
}

pub fn run_forms(data_dir: &Path) -> Result<()> {
    let workspace = Workspace::open(data_dir)?;
    let forms = workspace.forms.list()?;
    let counted: Vec<(Form, formdesk_admin::PostCounts)> = forms
        .into_iter()
        .map(|form| {
            let counts = post_counts(Some(&form), &workspace.submissions);
            (form, counts)
        })
        .collect();
    crate::summary::print_forms(&counted);
    Ok(())
}

pub fn run_list(data_dir: &Path, user: u64, args: &ListArgs) -> Result<ListingRows> {
    let workspace = Workspace::open(data_dir)?;
    let form = workspace.form(args.form_id)?;

    let mut query = ListingQuery::for_form(form.id);
    query.status = args.status.parse()?;
    query.begin_date = parse_date(args.begin_date.as_deref())?;
    query.end_date = parse_date(args.end_date.as_deref())?;
    query.search = args.search.clone();
    query.page = args.page;
    query.per_page = args.per_page;
    if let Some(slug) = &args.orderby {
        query.order_by = Some(
            OrderBy::parse(slug, &form)
                .with_context(|| format!("Unknown sort column: {slug}"))?,
        );
    }
    if args.desc {
        query.direction = SortDirection::Descending;
    }

    let controller = ListingController::new(&form);
    let rows = controller.rows(&workspace.submissions, &query, Utc::now());
    let visible = if args.all_columns {
        rows.columns.columns.clone()
    } else {
        rows.columns
            .visible_for_user(&workspace.options, user, form.id)?
    };
    crate::summary::print_listing(&rows, &visible);
    Ok(rows)
}

pub fn run_export(data_dir: &Path, args: &ExportArgs) -> Result<PathBuf> {
    let workspace = Workspace::open(data_dir)?;
    let form = workspace.form(args.form_id)?;
    let exporter = SubmissionCsvExporter::new(&form);

    let path = match &args.output {
        Some(path) => path.clone(),
        None => PathBuf::from(download_filename(&form, Utc::now().date_naive())),
    };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    if let Some(id) = args.single {
        let submission = workspace
            .submissions
            .get(id)
            .with_context(|| format!("No submission with id {id}"))?;
        exporter.export_single(submission, file)?;
    } else if !args.ids.is_empty() {
        exporter.export_selected(&workspace.submissions, &args.ids, file)?;
    } else {
        exporter.export_all(&workspace.submissions, file)?;
    }
    info!(path = %path.display(), "export written");
    Ok(path)
}

pub fn run_purge(data_dir: &Path, user: u64, args: &PurgeArgs) -> Result<usize> {
    let mut workspace = Workspace::open(data_dir)?;
    let form = workspace.form(args.form_id)?;
    let filename = match &args.filename {
        Some(name) => name.clone(),
        None => download_filename(&form, Utc::now().date_naive()),
    };

    let mut job = DeleteSubmissionsJob::new(form.id, user, filename, "/submissions");
    let report = job.loading(&workspace.submissions, &workspace.options)?;
    if report.complete {
        bail!("Nothing to purge: no form selected");
    }

    let bar = ProgressBar::new(u64::from(report.total_steps));
    let mut deleted = 0usize;
    for _ in 0..report.total_steps {
        let step = job.step(&mut workspace.submissions, &workspace.options)?;
        deleted += step.deleted.len();
        bar.inc(1);
    }
    job.complete(&workspace.options)?;
    bar.finish();

    workspace.persist()?;
    info!(form_id = form.id, deleted, "purge finished");
    Ok(deleted)
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))?;
    Ok(Some(date))
}
