mod init;

pub use init::cmd_init;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

use crate::cli::commands::{
    AddArgs, BulkArgs, Cli, Commands, EditArgs, IdArg, ListArgs, LoginArgs,
};
use crate::cli::output::{
    BulkJson, IdJson, ListJson, TodayJson, format_item_detail, format_item_line, format_stats,
    item_to_json, parse_difficulty, parse_sort_key, parse_sort_order, parse_stage,
};
use crate::io::library_io;
use crate::io::lock::StoreLock;
use crate::io::session;
use crate::model::workspace::Workspace;
use crate::ops::actions::{self, Action};
use crate::ops::item_ops::{self, ItemPatch, NewItem};
use crate::ops::query::{self, ListQuery};

/// Workspace directory override, set once from the global -C flag.
static WORKSPACE_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// How long a mutating command waits for the writer lock before giving up.
const WRITE_LOCK_WAIT: Duration = Duration::from_secs(5);

fn start_dir() -> Result<PathBuf, Box<dyn Error>> {
    if let Some(dir) = WORKSPACE_DIR_OVERRIDE.lock().unwrap().clone() {
        return Ok(dir);
    }
    Ok(std::env::current_dir()?)
}

fn find_workspace_root() -> Result<PathBuf, Box<dyn Error>> {
    let start = start_dir()?;
    Ok(library_io::discover_workspace(&start)?)
}

/// Workspace plus signed-in user, for read commands.
///
/// The session gate comes first: library.json is never read on behalf
/// of nobody.
fn open_workspace() -> Result<(Workspace, String), Box<dyn Error>> {
    let root = find_workspace_root()?;
    let session = session::require_session(&root.join("recall"))?;
    let ws = library_io::load_workspace(&root)?;
    Ok((ws, session.user_id))
}

/// Like [`open_workspace`], but holding the writer lock across the
/// caller's whole load-mutate-save window.
fn open_workspace_mut() -> Result<(Workspace, String, StoreLock), Box<dyn Error>> {
    let root = find_workspace_root()?;
    let recall_dir = root.join("recall");
    let session = session::require_session(&recall_dir)?;
    let lock = StoreLock::acquire(&recall_dir, WRITE_LOCK_WAIT)?;
    let ws = library_io::load_workspace(&root)?;
    Ok((ws, session.user_id, lock))
}

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(dir) = &cli.workspace_dir {
        let path = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot open workspace dir '{}': {}", dir, e))?;
        *WORKSPACE_DIR_OVERRIDE.lock().unwrap() = Some(path);
    }
    let json = cli.json;

    match cli.command {
        Commands::Init(args) => cmd_init(args, &start_dir()?),
        Commands::Login(args) => cmd_login(args),
        Commands::Logout => cmd_logout(),
        Commands::Whoami => cmd_whoami(json),
        Commands::Add(args) => cmd_add(args, json),
        Commands::List(args) => cmd_list(args, json),
        Commands::Show(args) => cmd_show(args, json),
        Commands::Edit(args) => cmd_edit(args),
        Commands::Review(args) => cmd_review(args),
        Commands::Archive(args) => cmd_archive(args),
        Commands::Delete(args) => cmd_delete(args),
        Commands::Duplicate(args) => cmd_duplicate(args, json),
        Commands::Bulk(args) => cmd_bulk(args, json),
        Commands::Today => cmd_today(json),
        Commands::Stats => cmd_stats(json),
    }
}

// ---------------------------------------------------------------------------
// Session commands (never touch library.json)
// ---------------------------------------------------------------------------

fn cmd_login(args: LoginArgs) -> Result<(), Box<dyn Error>> {
    let recall_dir = find_workspace_root()?.join("recall");
    session::write_session(&recall_dir, &args.user)?;
    println!("signed in as {}", args.user);
    Ok(())
}

fn cmd_logout() -> Result<(), Box<dyn Error>> {
    let recall_dir = find_workspace_root()?.join("recall");
    session::clear_session(&recall_dir);
    println!("signed out");
    Ok(())
}

fn cmd_whoami(json: bool) -> Result<(), Box<dyn Error>> {
    let recall_dir = find_workspace_root()?.join("recall");
    let session = session::require_session(&recall_dir)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("{}", session.user_id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Item commands
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    let difficulty = args
        .difficulty
        .as_deref()
        .map(parse_difficulty)
        .transpose()?;
    let new = NewItem {
        title: args.title,
        content: args.content,
        subject_name: args.subject,
        subject_color: args.color,
        tags: args.tag,
        difficulty,
        estimated_time: args.time,
    };
    let default_color = ws.config.view.default_color.clone();
    let id = item_ops::add_item(&mut ws.library, &user, new, &default_color, Utc::now());
    library_io::save_library(&ws.recall_dir, &ws.library)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&IdJson { id })?);
    } else {
        println!("added {}", id);
    }
    Ok(())
}

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn Error>> {
    let (ws, user) = open_workspace()?;

    let query = ListQuery {
        subject: args.subject,
        stage: args.stage.as_deref().map(parse_stage).transpose()?,
        difficulty: args
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .transpose()?,
        search: args
            .search
            .as_deref()
            .map(query::substring_pattern)
            .transpose()?,
        sort: parse_sort_key(&args.sort)?,
        order: parse_sort_order(&args.order)?,
        page: args.page,
        limit: args.limit.unwrap_or(ws.config.view.default_limit),
    };

    let now = Utc::now();
    let result = query::run_query(&ws.library, &user, &query, now);

    if json {
        let out = ListJson {
            items: result.items.iter().map(|i| item_to_json(i, now)).collect(),
            pagination: result.pagination,
            stats: result.stats,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        if result.items.is_empty() {
            println!("no matching items");
        }
        for item in &result.items {
            println!("{}", format_item_line(item, now));
        }
        println!();
        println!(
            "page {}/{} ({} matching)",
            result.pagination.page,
            result.pagination.pages.max(1),
            result.pagination.total
        );
        for line in format_stats(&ws.config.library.name, &result.stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: IdArg, json: bool) -> Result<(), Box<dyn Error>> {
    let (ws, user) = open_workspace()?;
    let item = item_ops::get_item(&ws.library, &user, &args.id)?;
    let now = Utc::now();
    if json {
        println!("{}", serde_json::to_string_pretty(&item_to_json(item, now))?);
    } else {
        for line in format_item_detail(item, now) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    let patch = ItemPatch {
        title: args.title,
        content: args.content,
        subject_name: args.subject,
        subject_color: args.color,
        tags: if args.tag.is_empty() {
            None
        } else {
            Some(args.tag)
        },
        difficulty: args
            .difficulty
            .as_deref()
            .map(parse_difficulty)
            .transpose()?,
        review_stage: args.stage.as_deref().map(parse_stage).transpose()?,
        estimated_time: args.time,
    };
    item_ops::update_item(&mut ws.library, &user, &args.id, patch, Utc::now())?;
    library_io::save_library(&ws.recall_dir, &ws.library)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_review(args: IdArg) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    item_ops::review_item(&mut ws.library, &user, &args.id, Utc::now())?;
    library_io::save_library(&ws.recall_dir, &ws.library)?;

    // The item is still active after a review, so this lookup cannot miss
    if let Some(item) = ws.library.find(&user, &args.id) {
        println!(
            "{} reviewed ({} reviews, {} stage)",
            args.id,
            item.review_count,
            item.review_stage.as_str()
        );
    }
    Ok(())
}

fn cmd_archive(args: IdArg) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    item_ops::archive_item(&mut ws.library, &user, &args.id, Utc::now())?;
    library_io::save_library(&ws.recall_dir, &ws.library)?;
    println!("{} archived", args.id);
    Ok(())
}

fn cmd_delete(args: IdArg) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    item_ops::soft_delete_item(&mut ws.library, &user, &args.id, Utc::now())?;
    library_io::save_library(&ws.recall_dir, &ws.library)?;
    println!("{} deleted", args.id);
    Ok(())
}

fn cmd_duplicate(args: IdArg, json: bool) -> Result<(), Box<dyn Error>> {
    let (mut ws, user, _lock) = open_workspace_mut()?;

    let id = item_ops::duplicate_item(&mut ws.library, &user, &args.id, Utc::now())?;
    library_io::save_library(&ws.recall_dir, &ws.library)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&IdJson { id })?);
    } else {
        println!("duplicated {} as {}", args.id, id);
    }
    Ok(())
}

fn cmd_bulk(args: BulkArgs, json: bool) -> Result<(), Box<dyn Error>> {
    // Reject a bad action name before touching the store
    let action = Action::parse(&args.action)?;

    let (mut ws, user, _lock) = open_workspace_mut()?;

    let modified = actions::apply_bulk(&mut ws.library, &user, &args.ids, action, Utc::now());
    library_io::save_library(&ws.recall_dir, &ws.library)?;

    if json {
        let out = BulkJson {
            action: action.as_str().to_string(),
            modified_count: modified,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let verb = match action {
            Action::Reviewed => "marked reviewed",
            Action::Archive => "archived",
            Action::Delete => "deleted",
        };
        let noun = if modified == 1 { "item" } else { "items" };
        println!("{} {} {}", modified, noun, verb);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

fn cmd_today(json: bool) -> Result<(), Box<dyn Error>> {
    let (ws, user) = open_workspace()?;

    let now = Utc::now();
    let due = query::due_items(&ws.library, &user, now);
    let minutes: u32 = due.iter().map(|item| item.estimated_minutes()).sum();

    if json {
        let out = TodayJson {
            items: due.iter().map(|i| item_to_json(i, now)).collect(),
            due_count: due.len(),
            estimated_minutes: minutes,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if due.is_empty() {
        println!("nothing due today");
    } else {
        for item in &due {
            println!("{}", format_item_line(item, now));
        }
        println!();
        let noun = if due.len() == 1 { "item" } else { "items" };
        println!("{} {} due (about {} min)", due.len(), noun, minutes);
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn Error>> {
    let (ws, user) = open_workspace()?;

    let stats = query::collect_stats(&ws.library, &user, Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats(&ws.config.library.name, &stats) {
            println!("{}", line);
        }
    }
    Ok(())
}
