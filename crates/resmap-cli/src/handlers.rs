use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _};
use tracing::{debug, info};

use resmap_client::defaults::MAX_DEPTH;
use resmap_client::{
    check_forest, commit_move, flatten, parent_candidates, ExpandState, LocationMetadata,
    MoveOutcome, TagBackend, TagId, TagStore, TagType, UpdateTagRequest, WorkspaceId,
};

use crate::cli::{Cli, Commands, CreateArgs, MoveArgs, TreeArgs};
use crate::output::{render_rows, render_tag, CheckJson, RowJson};

/// Resolved global options.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub workspace_id: WorkspaceId,
    pub tag_type: TagType,
    pub max_depth: usize,
    pub json: bool,
}

impl Settings {
    /// Flags first, then the environment.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    pub fn resolve_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let workspace = cli
            .workspace
            .clone()
            .or_else(|| env("RESMAP_WORKSPACE_ID"))
            .filter(|w| !w.trim().is_empty())
            .ok_or_else(|| anyhow!("no workspace: pass --workspace or set RESMAP_WORKSPACE_ID"))?;

        let tag_type: TagType = cli.tag_type.parse().map_err(|e: String| anyhow!(e))?;

        let max_depth = match cli.max_depth {
            Some(depth) => depth,
            None => match env("RESMAP_MAX_DEPTH") {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("RESMAP_MAX_DEPTH is not a number: {}", raw))?,
                None => MAX_DEPTH,
            },
        };

        Ok(Self {
            workspace_id: WorkspaceId::new(workspace),
            tag_type,
            max_depth,
            json: cli.json,
        })
    }
}

/// What a command printed, and whether it should exit non-zero.
#[derive(Debug, Default)]
pub struct Report {
    pub text: String,
    pub failed: bool,
}

impl Report {
    fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: false,
        }
    }

    fn failed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            failed: true,
        }
    }
}

pub async fn dispatch(
    cli: Cli,
    settings: &Settings,
    backend: Arc<dyn TagBackend>,
) -> anyhow::Result<Report> {
    let mut store = TagStore::load(
        backend,
        settings.workspace_id.clone(),
        settings.tag_type,
        settings.max_depth,
    )
    .await
    .context("failed to fetch tags")?;
    debug!(tag_count = store.list().len(), "Tags loaded");

    match cli.command {
        Commands::Tree(args) => cmd_tree(&store, args, settings.json),
        Commands::Create(args) => cmd_create(&mut store, args, settings.json).await,
        Commands::Rename(args) => {
            let tag = store
                .update(&args.id.into(), UpdateTagRequest::value(args.value))
                .await?;
            render_one(&tag, settings.json)
        }
        Commands::Move(args) => cmd_move(&mut store, args).await,
        Commands::Delete(args) => {
            let id = TagId::from(args.id);
            if store.delete(&id, args.cascade).await? {
                info!(tag_id = %id, "Deleted");
                Ok(Report::ok(format!("Deleted {}", id)))
            } else {
                Ok(Report::failed(format!("Store did not confirm deleting {}", id)))
            }
        }
        Commands::Check => cmd_check(&store, settings),
        Commands::Parents(args) => {
            let id = TagId::from(args.id);
            let candidates = parent_candidates(store.list(), &id, settings.max_depth)?;
            if settings.json {
                return Ok(Report::ok(serde_json::to_string_pretty(&candidates)?));
            }
            let lines: Vec<String> = candidates.iter().map(|t| render_tag(t)).collect();
            Ok(Report::ok(lines.join("\n")))
        }
    }
}

fn cmd_tree(store: &TagStore, args: TreeArgs, json: bool) -> anyhow::Result<Report> {
    let tags = store.list();
    let mut state = if args.collapsed {
        ExpandState::new()
    } else {
        ExpandState::all_expanded(tags)
    };
    for id in args.collapse {
        state.collapse(&id.into());
    }
    for id in args.reveal {
        let id = TagId::from(id);
        if store.get(&id).is_none() {
            bail!("unknown tag {}", id);
        }
        state.reveal(tags, &id);
    }

    let tree = state.build(tags);
    let rows = flatten(&tree);
    if json {
        let rows: Vec<RowJson<'_>> = rows.iter().map(|n| RowJson::from_node(n)).collect();
        return Ok(Report::ok(serde_json::to_string_pretty(&rows)?));
    }
    Ok(Report::ok(render_rows(&rows).trim_end().to_string()))
}

async fn cmd_create(store: &mut TagStore, args: CreateArgs, json: bool) -> anyhow::Result<Report> {
    let location = match (args.lat, args.lng, args.plus_code) {
        (Some(lat), Some(lng), _) => Some(LocationMetadata::LatLng {
            lat,
            lng,
            accuracy: None,
        }),
        (_, _, Some(code)) => Some(LocationMetadata::PlusCode { code }),
        _ => None,
    };
    let parent = args.parent.map(TagId::from);

    let tag = store.create(&args.value, parent.as_ref(), location).await?;
    render_one(&tag, json)
}

async fn cmd_move(store: &mut TagStore, args: MoveArgs) -> anyhow::Result<Report> {
    let id = TagId::from(args.id);

    let Some(target) = args.under.map(TagId::from) else {
        return if store.reparent(&id, None).await? {
            Ok(Report::ok(format!("Moved {} to root", id)))
        } else {
            Ok(Report::failed(format!("Store did not move {} to root", id)))
        };
    };

    let report = match commit_move(store, &id, &target).await? {
        MoveOutcome::Applied => {
            let path = store
                .get(&id)
                .map(|t| t.display_path())
                .unwrap_or_else(|| id.to_string());
            Report::ok(format!("Moved to {}", path))
        }
        MoveOutcome::Unchanged => Report::ok(format!("{} is already under {}", id, target)),
        MoveOutcome::Rejected(reason) => Report::failed(format!(
            "Cannot move {} under {}: {}",
            id,
            target,
            reason.code()
        )),
    };
    Ok(report)
}

fn cmd_check(store: &TagStore, settings: &Settings) -> anyhow::Result<Report> {
    let violations = check_forest(store.list(), settings.max_depth);
    let fatal = violations.iter().filter(|v| v.is_fatal()).count();

    let text = if settings.json {
        serde_json::to_string_pretty(&CheckJson {
            tag_count: store.list().len(),
            fatal,
            violations: &violations,
        })?
    } else {
        let mut lines: Vec<String> = violations.iter().map(|v| v.to_string()).collect();
        lines.push(format!(
            "{} tags, {} problem(s), {} fatal",
            store.list().len(),
            violations.len(),
            fatal
        ));
        lines.join("\n")
    };

    Ok(Report {
        text,
        failed: fatal > 0,
    })
}

fn render_one(tag: &resmap_client::Tag, json: bool) -> anyhow::Result<Report> {
    if json {
        Ok(Report::ok(serde_json::to_string_pretty(tag)?))
    } else {
        Ok(Report::ok(render_tag(tag)))
    }
}
