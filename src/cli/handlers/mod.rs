use crate::cli::commands::*;
use crate::cli::output::*;
use crate::context::AppContext;
use crate::io::autosave::MEMO_AUTOSAVE_KEY;
use crate::io::{memo_io, recovery};
use crate::model::todo::{Bucket, ItemId, TodoCollection};
use crate::ops::todo_ops::{self, EditOutcome};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let ctx = AppContext::open(cli.data_dir.as_deref())?;

    match cli.command {
        None => Err("no command given (run `np` without arguments for the editor)".into()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&ctx, args, json),
            Commands::Paths => cmd_paths(&ctx, json),
            Commands::Recovery(args) => cmd_recovery(&ctx, args, json),

            // Write commands
            Commands::Add(args) => cmd_add(&ctx, args),
            Commands::Toggle(args) => cmd_toggle(&ctx, args),
            Commands::Edit(args) => cmd_edit(&ctx, args),
            Commands::Rm(args) => cmd_rm(&ctx, args),
            Commands::Mv(args) => cmd_mv(&ctx, args),

            Commands::Memo(cmd) => cmd_memo(&ctx, cmd.action, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The stored list. A missing file is an empty list; a malformed one is an
/// error so the command never writes over it. Write commands hold the
/// store lock across this read and their save.
fn load_todos(ctx: &AppContext) -> Result<TodoCollection, Box<dyn std::error::Error>> {
    Ok(ctx
        .store
        .read()?
        .map(|file| file.into_collection())
        .unwrap_or_default())
}

fn parse_bucket(name: &str) -> Result<Bucket, Box<dyn std::error::Error>> {
    Bucket::parse_bucket(name).ok_or_else(|| {
        format!(
            "unknown bucket '{}' (expected immediate, backlog or done)",
            name
        )
        .into()
    })
}

/// Resolve a bucket name plus 1-based index to the item's position
fn locate_item(
    collection: &TodoCollection,
    bucket: &str,
    index: usize,
) -> Result<(Bucket, ItemId), Box<dyn std::error::Error>> {
    let bucket = parse_bucket(bucket)?;
    if index == 0 {
        return Err("item numbers start at 1".into());
    }
    let id = todo_ops::id_at(collection, bucket, index - 1).map_err(|_| {
        format!(
            "no item {} in {} ({} items)",
            index,
            bucket,
            collection.bucket(bucket).len()
        )
    })?;
    Ok((bucket, id))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(ctx: &AppContext, args: ListArgs, json: bool) -> CmdResult {
    let collection = load_todos(ctx)?;
    let buckets: Vec<Bucket> = match args.bucket {
        Some(name) => vec![parse_bucket(&name)?],
        None => Bucket::ALL.to_vec(),
    };

    if json {
        let out: Vec<BucketJson> = buckets
            .iter()
            .map(|&b| bucket_to_json(&collection, b))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let sections: Vec<String> = buckets
            .iter()
            .map(|&b| format_bucket(&collection, b))
            .collect();
        print!("{}", sections.join("\n"));
    }
    Ok(())
}

fn cmd_paths(ctx: &AppContext, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&paths_to_json(&ctx.paths))?);
    } else {
        print!("{}", format_paths(&ctx.paths));
    }
    Ok(())
}

fn cmd_recovery(ctx: &AppContext, args: RecoveryArgs, json: bool) -> CmdResult {
    if args.clear {
        let count = recovery::clear_recovery(&ctx.paths)?;
        if count == 0 {
            println!("recovery log is empty");
        } else {
            println!("cleared {} recovery entries", count);
        }
        return Ok(());
    }

    let entries = recovery::read_recovery_entries(&ctx.paths, args.limit);
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_recovery(&entries));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(ctx: &AppContext, args: AddArgs) -> CmdResult {
    let guard = ctx.store.lock()?;
    let mut collection = load_todos(ctx)?;
    let bucket = if args.backlog {
        Bucket::Backlog
    } else {
        Bucket::Immediate
    };
    todo_ops::add_item(&mut collection, &args.text, bucket)?;
    ctx.store.write_locked(&collection, &guard)?;
    println!("added to {} as #{}", bucket, collection.bucket(bucket).len());
    Ok(())
}

fn cmd_toggle(ctx: &AppContext, args: ItemArgs) -> CmdResult {
    let guard = ctx.store.lock()?;
    let mut collection = load_todos(ctx)?;
    let (_, id) = locate_item(&collection, &args.bucket, args.index)?;
    let landed = todo_ops::toggle_done(&mut collection, id)?;
    ctx.store.write_locked(&collection, &guard)?;
    let state = if landed == Bucket::Done {
        "checked"
    } else {
        "unchecked"
    };
    println!(
        "{}, now {} #{}",
        state,
        landed,
        collection.bucket(landed).len()
    );
    Ok(())
}

fn cmd_edit(ctx: &AppContext, args: EditArgs) -> CmdResult {
    let guard = ctx.store.lock()?;
    let mut collection = load_todos(ctx)?;
    let (_, id) = locate_item(&collection, &args.bucket, args.index)?;
    let original = collection
        .get(id)
        .map(|item| item.text.clone())
        .unwrap_or_default();
    match todo_ops::commit_text(&mut collection, id, &original, &args.text)? {
        EditOutcome::Changed => {
            ctx.store.write_locked(&collection, &guard)?;
            println!("updated");
        }
        EditOutcome::Reverted => println!("text is blank, kept the old text"),
    }
    Ok(())
}

fn cmd_rm(ctx: &AppContext, args: ItemArgs) -> CmdResult {
    let guard = ctx.store.lock()?;
    let mut collection = load_todos(ctx)?;
    let (_, id) = locate_item(&collection, &args.bucket, args.index)?;
    let item = todo_ops::delete_item(&mut collection, id)?;
    ctx.store.write_locked(&collection, &guard)?;
    println!("deleted: {}", item.text.lines().next().unwrap_or_default());
    Ok(())
}

fn cmd_mv(ctx: &AppContext, args: MvArgs) -> CmdResult {
    let guard = ctx.store.lock()?;
    let mut collection = load_todos(ctx)?;
    let (_, id) = locate_item(&collection, &args.bucket, args.index)?;
    let to = parse_bucket(&args.to)?;
    let index = match args.at {
        Some(0) => return Err("positions start at 1".into()),
        Some(at) => at - 1,
        None => usize::MAX,
    };
    let landed = todo_ops::move_item(&mut collection, id, to, index)?;
    ctx.store.write_locked(&collection, &guard)?;
    println!("moved to {} #{}", to, landed + 1);
    Ok(())
}

// ---------------------------------------------------------------------------
// Memo
// ---------------------------------------------------------------------------

fn cmd_memo(ctx: &AppContext, action: MemoAction, json: bool) -> CmdResult {
    match action {
        MemoAction::Show => {
            let content = ctx.autosave.get(MEMO_AUTOSAVE_KEY);
            if json {
                println!("{}", serde_json::to_string_pretty(&MemoJson { content })?);
            } else if let Some(text) = content {
                print!("{}", text);
                if !text.is_empty() && !text.ends_with('\n') {
                    println!();
                }
            }
        }
        MemoAction::Export { path } => {
            let content = ctx.autosave.get(MEMO_AUTOSAVE_KEY).unwrap_or_default();
            let written = memo_io::save_markdown(&path, &content)?;
            println!("saved {}", written.display());
        }
        MemoAction::Import { path } => {
            let content = memo_io::open_markdown(&path)?;
            ctx.autosave.set(MEMO_AUTOSAVE_KEY, &content)?;
            println!("imported {} ({} bytes)", path.display(), content.len());
        }
        MemoAction::Clear => {
            if ctx.autosave.remove(MEMO_AUTOSAVE_KEY)? {
                println!("memo cleared");
            } else {
                println!("no autosaved memo");
            }
        }
    }
    Ok(())
}
