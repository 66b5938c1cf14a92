use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use homeboard_admin::ListController;
use homeboard_model::{
    Article, Clock, FieldAccess, Fields, Listing, ModelError, SystemClock, User,
    coerce_field_value, fields_from_pairs,
};
use homeboard_query::{ALL, FilterState, SortSpec};
use homeboard_store::{
    DraftManager, DurableStore, FallbackStorage, FileStorage, KeyValueStorage, StorageError,
    UnavailableStorage,
};

use crate::cli::{BulkAction, BulkArgs, Command, ConfigArgs, DraftCommand, QueryArgs, Resource};
use crate::settings::Settings;
use crate::summary::{describe_filter, page_summary, record_table};

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Table or JSON document for stdout.
    pub body: Option<String>,
    /// One-line status.
    pub summary: String,
}

impl Outcome {
    fn line(summary: impl Into<String>) -> Self {
        Self {
            body: None,
            summary: summary.into(),
        }
    }

    fn with_body(body: String, summary: impl Into<String>) -> Self {
        Self {
            body: Some(body),
            summary: summary.into(),
        }
    }
}

/// Resource types the CLI can manage.
pub trait AdminResource: Fields + FieldAccess + Default {
    /// Columns shown by `list` after the id.
    const COLUMNS: &'static [&'static str];
}

impl AdminResource for Article {
    const COLUMNS: &'static [&'static str] = &["title", "author", "category", "status", "publishedAt"];
}

impl AdminResource for Listing {
    const COLUMNS: &'static [&'static str] = &[
        "title",
        "city",
        "propertyType",
        "listingType",
        "status",
        "price",
        "bedrooms",
    ];
}

impl AdminResource for User {
    const COLUMNS: &'static [&'static str] = &["name", "email", "role", "status", "city"];
}

/// Storage, clock and settings shared by every command of one invocation.
pub struct Workspace {
    settings: Settings,
    config_path: PathBuf,
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
}

impl Workspace {
    /// File-backed workspace in the settings' data directory.
    pub fn open(settings: Settings, config_path: PathBuf) -> Self {
        let storage = open_storage(&settings.data_dir());
        Self::with_storage(settings, config_path, storage, Arc::new(SystemClock))
    }

    pub fn with_storage(
        settings: Settings,
        config_path: PathBuf,
        storage: Arc<dyn KeyValueStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            config_path,
            storage,
            clock,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether changes made in this session may not have reached disk.
    pub fn is_degraded(&self) -> bool {
        self.storage.is_degraded()
    }

    fn store<F: Fields>(&self) -> DurableStore<F> {
        DurableStore::new(Arc::clone(&self.storage), Arc::clone(&self.clock))
    }

    fn drafts<F: Fields + Default>(&self) -> DraftManager<F> {
        DraftManager::for_resource(
            Arc::clone(&self.storage),
            Arc::clone(&self.clock),
            &self.settings.drafts,
        )
    }
}

/// File storage in `dir`, degrading to session memory when it fails.
pub fn open_storage(dir: &Path) -> Arc<dyn KeyValueStorage> {
    match FileStorage::open(dir) {
        Ok(files) => {
            info!(dir = %dir.display(), "using file storage");
            Arc::new(FallbackStorage::new(files))
        }
        Err(error) => {
            warn!(dir = %dir.display(), %error, "data directory unusable");
            Arc::new(FallbackStorage::new(UnavailableStorage::new(error.to_string())))
        }
    }
}

/// The message shown when a session's changes were not persisted.
pub fn degraded_notice() -> String {
    StorageError::Unavailable {
        reason: String::new(),
    }
    .user_message()
}

pub fn execute(workspace: &Workspace, command: Command) -> Result<Outcome> {
    let resource = match &command {
        Command::Config(args) => return run_config(workspace, args),
        other => other.resource(),
    };
    match resource {
        Some(Resource::Articles) => run::<Article>(workspace, command),
        Some(Resource::Listings) => run::<Listing>(workspace, command),
        Some(Resource::Users) => run::<User>(workspace, command),
        None => bail!("this command does not take a resource"),
    }
}

fn run<F: AdminResource>(workspace: &Workspace, command: Command) -> Result<Outcome> {
    match command {
        Command::List(args) => run_list::<F>(workspace, &args.query),
        Command::Show(args) => run_show::<F>(workspace, &args.id),
        Command::Add(args) => run_add::<F>(workspace, args.id, &args.fields),
        Command::Update(args) => run_update::<F>(workspace, &args.id, &args.fields),
        Command::Remove(args) => run_remove::<F>(workspace, &args.id),
        Command::Bulk(args) => run_bulk::<F>(workspace, &args),
        Command::Draft { command } => run_draft::<F>(workspace, command),
        Command::Config(args) => run_config(workspace, &args),
    }
}

// =============================================================================
// Records
// =============================================================================

fn run_list<F: AdminResource>(workspace: &Workspace, query: &QueryArgs) -> Result<Outcome> {
    let controller = list_controller::<F>(workspace, query);
    let page = controller.view();

    let mut summary = page_summary(F::COLLECTION_KEY, &page, query.page);
    if let Some(filters) = describe_filter(controller.filter()) {
        summary.push_str(&format!(" [{filters}]"));
    }
    if page.is_empty() {
        return Ok(Outcome::line(summary));
    }

    let columns: Vec<&str> = std::iter::once("id")
        .chain(F::COLUMNS.iter().copied())
        .collect();
    let table = record_table(&page.items, &columns);
    Ok(Outcome::with_body(table.to_string(), summary))
}

fn run_show<F: AdminResource>(workspace: &Workspace, id: &str) -> Result<Outcome> {
    let record = workspace
        .store::<F>()
        .get_by_id(id)
        .ok_or_else(|| anyhow!("no {} with id `{id}`", F::RESOURCE))?;
    let body = to_pretty_json(&record)?;
    Ok(Outcome::with_body(
        body,
        format!("{} {id}, last updated {}", F::RESOURCE, record.updated_at()),
    ))
}

fn run_add<F: AdminResource>(
    workspace: &Workspace,
    id: Option<String>,
    pairs: &[(String, String)],
) -> Result<Outcome> {
    let template = template::<F>()?;
    let fields: F = fields_from_pairs(F::RESOURCE, &template, pairs).map_err(user_facing)?;
    let mut controller = ListController::new(workspace.store::<F>());

    let id = match id {
        Some(id) => {
            if !controller.add(id.clone(), fields) {
                bail!(
                    "could not add {} `{id}`: the id is empty or already taken",
                    F::RESOURCE
                );
            }
            id
        }
        None => controller.add_new(fields),
    };
    Ok(Outcome::line(format!(
        "added {} {id} ({} total)",
        F::RESOURCE,
        controller.records().len()
    )))
}

fn run_update<F: AdminResource>(
    workspace: &Workspace,
    id: &str,
    pairs: &[(String, String)],
) -> Result<Outcome> {
    let store = workspace.store::<F>();
    if store.get_by_id(id).is_none() {
        bail!("no {} with id `{id}`", F::RESOURCE);
    }
    let patch = patch_from_pairs::<F>(pairs)?;
    store.update(id, &patch);
    Ok(Outcome::line(format!(
        "updated {} {id} ({} field{})",
        F::RESOURCE,
        pairs.len(),
        plural(pairs.len())
    )))
}

fn run_remove<F: AdminResource>(workspace: &Workspace, id: &str) -> Result<Outcome> {
    let store = workspace.store::<F>();
    if store.get_by_id(id).is_none() {
        return Ok(Outcome::line(format!(
            "no {} with id {id}, nothing removed",
            F::RESOURCE
        )));
    }
    let remaining = store.remove(id).len();
    Ok(Outcome::line(format!(
        "removed {} {id} ({remaining} left)",
        F::RESOURCE
    )))
}

fn run_bulk<F: AdminResource>(workspace: &Workspace, args: &BulkArgs) -> Result<Outcome> {
    // Parse the patch before touching anything.
    let patch = match args.action {
        BulkAction::Update if args.fields.is_empty() => {
            bail!("bulk update needs at least one --set FIELD=VALUE")
        }
        BulkAction::Update => Some(patch_from_pairs::<F>(&args.fields)?),
        BulkAction::Remove => None,
    };

    let mut controller = list_controller::<F>(workspace, &args.query);
    if args.all_on_page {
        controller.toggle_all_on_page();
    }
    let mut skipped = Vec::new();
    for id in &args.select {
        if !controller.selection().contains(id) && !controller.toggle(id) {
            skipped.push(id.as_str());
        }
    }
    if !skipped.is_empty() {
        warn!(ids = ?skipped, "selected ids are not in the filtered list, skipping them");
    }

    let mut summary = if controller.selection().is_empty() {
        format!("no {} selected, nothing changed", F::COLLECTION_KEY)
    } else {
        let (verb, count) = match &patch {
            Some(patch) => ("updated", controller.bulk_update(patch)),
            None => ("removed", controller.bulk_remove()),
        };
        format!("{verb} {count} {}{}", F::RESOURCE, plural(count))
    };
    if !skipped.is_empty() {
        summary.push_str(&format!(
            "; skipped {} id{} outside the filter: {}",
            skipped.len(),
            plural(skipped.len()),
            skipped.join(", ")
        ));
    }
    Ok(Outcome::line(summary))
}

// =============================================================================
// Drafts
// =============================================================================

fn run_draft<F: AdminResource>(workspace: &Workspace, command: DraftCommand) -> Result<Outcome> {
    let mut drafts = workspace.drafts::<F>();
    match command {
        DraftCommand::Show { .. } => Ok(match drafts.load_draft() {
            Some(draft) => Outcome::with_body(to_pretty_json(&draft)?, format!("{} draft", F::RESOURCE)),
            None => Outcome::line(format!("no {} draft", F::RESOURCE)),
        }),

        DraftCommand::Set { fields, .. } => {
            drafts.restore();
            let template = serde_json::to_value(drafts.current().cloned().unwrap_or_default())
                .context("serialize draft")?;
            // Reject unknown fields and bad values up front instead of
            // having the editor skip them one by one.
            patch_from_pairs::<F>(&fields)?;

            for (field, raw) in &fields {
                drafts.on_field_change(field, coerce_field_value(template.get(field), raw));
            }
            let draft = drafts.current().cloned().unwrap_or_default();
            if !drafts.save_draft(draft) {
                bail!("could not save the {} draft", F::RESOURCE);
            }
            let body = drafts.current().map(to_pretty_json).transpose()?;
            Ok(Outcome {
                body,
                summary: format!("saved {} draft", F::RESOURCE),
            })
        }

        DraftCommand::Clear { .. } => {
            drafts.clear_draft();
            Ok(Outcome::line(format!("cleared {} draft", F::RESOURCE)))
        }

        DraftCommand::Publish { id, .. } => {
            let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let record = drafts
                .publish(&workspace.store::<F>(), id.clone(), |draft| draft)
                .ok_or_else(|| {
                    anyhow!(
                        "could not publish the {} draft: no draft is stored or id `{id}` is taken",
                        F::RESOURCE
                    )
                })?;
            Ok(Outcome::with_body(
                to_pretty_json(&record)?,
                format!("published {} draft as {id}", F::RESOURCE),
            ))
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

fn run_config(workspace: &Workspace, args: &ConfigArgs) -> Result<Outcome> {
    let path = workspace.config_path.display();
    if args.init {
        workspace.settings.save_to(&workspace.config_path)?;
        return Ok(Outcome::line(format!("wrote settings to {path}")));
    }
    Ok(Outcome::with_body(
        workspace.settings.to_toml()?,
        format!(
            "settings from {path}, data in {}",
            workspace.settings.data_dir().display()
        ),
    ))
}

// =============================================================================
// Helpers
// =============================================================================

fn list_controller<F: AdminResource>(workspace: &Workspace, query: &QueryArgs) -> ListController<F> {
    let page_size = query.page_size.unwrap_or(workspace.settings.list.page_size);
    let mut controller = ListController::with_page_size(workspace.store::<F>(), page_size);
    controller.set_filter(filter_from_args::<F>(query));
    if let Some(field) = &query.sort {
        controller.set_sort(if query.descending {
            SortSpec::descending(field.clone())
        } else {
            SortSpec::ascending(field.clone())
        });
    }
    controller.go_to_page(query.page);
    controller
}

/// Build the filter, warning about fields the resource cannot filter on.
pub fn filter_from_args<F: FieldAccess>(query: &QueryArgs) -> FilterState {
    let mut filter = FilterState::new().with_term(query.search.clone().unwrap_or_default());
    for (field, value) in &query.filters {
        if !F::CATEGORY_FIELDS.contains(&field.as_str()) {
            warn!(
                field = %field,
                allowed = ?F::CATEGORY_FIELDS,
                "filter ignored, field is not filterable"
            );
        } else if let Some(allowed) = F::category_values(field)
            && !value.trim().is_empty()
            && !value.trim().eq_ignore_ascii_case(ALL)
            && !allowed.iter().any(|label| label.eq_ignore_ascii_case(value.trim()))
        {
            warn!(field = %field, value = %value, ?allowed, "filter ignored, unknown value");
        }
        filter = filter.with_category(field.clone(), value.clone());
    }
    filter.since.clone_from(&query.since);
    if filter.since.is_some() && filter.since_date().is_none() {
        warn!(since = ?query.since, "date filter ignored, expected YYYY-MM-DD");
    }
    filter
}

fn template<F: AdminResource>() -> Result<Value> {
    serde_json::to_value(F::default()).context("serialize field template")
}

fn patch_from_pairs<F: AdminResource>(pairs: &[(String, String)]) -> Result<F::Patch> {
    fields_from_pairs(F::RESOURCE, &template::<F>()?, pairs).map_err(user_facing)
}

fn user_facing(error: ModelError) -> anyhow::Error {
    let message = error.user_message();
    anyhow::Error::new(error).context(message)
}

fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize JSON")
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}
