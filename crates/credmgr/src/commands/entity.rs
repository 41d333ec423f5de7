//! Generic list / search / get / create / update / patch / delete handling.
//!
//! Each handler drives one operation on an `EntityStore` and renders the
//! store's resulting state. Per-type modules only supply rows, detail
//! views, and how their flags map onto a record.

use std::fmt::Write as _;
use std::path::Path;

use tabled::Tabled;

use credmgr_core::{EntityId, EntityStore, Record};

use super::{Ctx, util};
use crate::cli::{EntityCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

/// How a record type is shown on the terminal.
pub trait EntityView: Record {
    type Row: Tabled;

    /// Human-readable type name for messages ("identity provider").
    const LABEL: &'static str;

    fn row(&self) -> Self::Row;

    fn detail(&self) -> String;

    /// Starting point for a merge patch: the id and nothing else.
    fn patch_base(id: EntityId) -> Self;
}

/// Field flags of a create/update/patch subcommand.
pub trait FieldArgs<R> {
    fn from_file(&self) -> Option<&Path>;

    /// Overlay every flag that was given onto `record`.
    fn apply(self, record: &mut R) -> Result<(), CliError>;
}

fn id_of<R: Record>(record: &R) -> String {
    record.id().map(ToString::to_string).unwrap_or_default()
}

/// Build a record from `--from-file` or from flags over `base`.
fn build<R, F>(base: R, fields: F) -> Result<R, CliError>
where
    R: Record,
    F: FieldArgs<R>,
{
    if let Some(path) = fields.from_file() {
        return util::read_json_file(path);
    }
    let mut record = base;
    fields.apply(&mut record)?;
    Ok(record)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<R, F>(
    store: &EntityStore<R>,
    command: EntityCommand<F>,
    ctx: &Ctx<'_>,
) -> Result<(), CliError>
where
    R: EntityView,
    F: FieldArgs<R> + clap::Args,
{
    match command {
        EntityCommand::List(page) => {
            store.list(&util::list_query(&page, ctx.page_size)).await?;
            render_listing(store, ctx)
        }

        EntityCommand::Search { query, page } => {
            store
                .search(&query, &util::list_query(&page, ctx.page_size))
                .await?;
            render_listing(store, ctx)
        }

        EntityCommand::Get { id } => {
            store.get(&EntityId::from(id)).await?;
            render_entity(store, ctx)
        }

        EntityCommand::Create(fields) => {
            let record = build(R::default(), fields)?;
            let saved = store.create(&record).await?;
            output::success(
                ctx.global,
                &format!("Created {} {}", R::LABEL, id_of(&saved)),
            );
            render_entity(store, ctx)
        }

        EntityCommand::Update { id, fields } => {
            let id = EntityId::from(id);
            // Flags edit the current record; a file replaces it wholesale.
            let mut record = if fields.from_file().is_some() {
                build(R::default(), fields)?
            } else {
                let current = store.get(&id).await?;
                build(current, fields)?
            };
            record.set_id(id);
            let saved = store.update(&record).await?;
            output::success(
                ctx.global,
                &format!("Updated {} {}", R::LABEL, id_of(&saved)),
            );
            render_entity(store, ctx)
        }

        EntityCommand::Patch { id, fields } => {
            let id = EntityId::from(id);
            let mut record = build(R::patch_base(id.clone()), fields)?;
            record.set_id(id);
            let saved = store.partial_update(&record).await?;
            output::success(
                ctx.global,
                &format!("Patched {} {}", R::LABEL, id_of(&saved)),
            );
            render_entity(store, ctx)
        }

        EntityCommand::Delete { id } => {
            let action = format!("delete {} {id}", R::LABEL);
            if !util::confirm(&format!("Delete {} {id}?", R::LABEL), &action, ctx.global.yes)? {
                eprintln!("Aborted.");
                return Ok(());
            }
            store.delete(&EntityId::from(id.as_str())).await?;
            output::success(ctx.global, &format!("Deleted {} {id}", R::LABEL));
            Ok(())
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

fn render_listing<R: EntityView>(store: &EntityStore<R>, ctx: &Ctx<'_>) -> Result<(), CliError> {
    let state = store.snapshot();
    let mut out = output::render_list(&ctx.global.output, &state.entities, R::row, id_of)?;

    if ctx.global.output == OutputFormat::Table {
        let _ = write!(out, "\ntotal: {}", state.total_items);
        if let Some(next) = state.links.next {
            let _ = write!(out, " (next page: --page {next})");
        }
    }

    output::print_output(&out, ctx.global.quiet);
    Ok(())
}

fn render_entity<R: EntityView>(store: &EntityStore<R>, ctx: &Ctx<'_>) -> Result<(), CliError> {
    let state = store.snapshot();
    let out = output::render_single(&ctx.global.output, &state.entity, R::detail, id_of)?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
