use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rcl", about = concat!("[~] recall v", env!("CARGO_PKG_VERSION"), " - your study library, on schedule"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new recall workspace in the current directory
    Init(InitArgs),
    /// Sign in as a user
    Login(LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Add a content item
    Add(AddArgs),
    /// List items with filters, sorting, and pagination
    List(ListArgs),
    /// Show one item in full
    Show(IdArg),
    /// Edit item fields
    Edit(EditArgs),
    /// Mark an item as reviewed (advances its review stage)
    Review(IdArg),
    /// Archive an item
    Archive(IdArg),
    /// Delete an item (soft delete — recoverable in storage)
    Delete(IdArg),
    /// Duplicate an item (the copy restarts its review ladder)
    Duplicate(IdArg),
    /// Apply one action to many items at once
    Bulk(BulkArgs),
    /// Show items due for review right now
    Today,
    /// Show library statistics
    Stats,
}

// ---------------------------------------------------------------------------
// Workspace and session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Library name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Reinitialize even if recall/ already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct LoginArgs {
    /// User to sign in as
    pub user: String,
}

// ---------------------------------------------------------------------------
// Item command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Item ID (e.g. C-014)
    pub id: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Body text of the item
    pub content: String,
    /// Item title
    #[arg(long)]
    pub title: Option<String>,
    /// Subject name
    #[arg(long, default_value = "General")]
    pub subject: String,
    /// Subject color token (default: from library.toml)
    #[arg(long)]
    pub color: Option<String>,
    /// Tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Estimated time label, e.g. "5 min"
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by subject name (exact match)
    #[arg(long)]
    pub subject: Option<String>,
    /// Filter by review stage (daily, weekly, monthly, yearly)
    #[arg(long)]
    pub stage: Option<String>,
    /// Filter by difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Case-insensitive text search over title, content, tags, and subject
    #[arg(long)]
    pub search: Option<String>,
    /// Sort key (created, title, next-review, difficulty, stage)
    #[arg(long, default_value = "created")]
    pub sort: String,
    /// Sort order (asc, desc)
    #[arg(long, default_value = "desc")]
    pub order: String,
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,
    /// Page size (default: from library.toml)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Item ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New body text
    #[arg(long)]
    pub content: Option<String>,
    /// New subject name
    #[arg(long)]
    pub subject: Option<String>,
    /// New subject color token
    #[arg(long)]
    pub color: Option<String>,
    /// Replace the tag set (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// New difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<String>,
    /// Set the review stage directly (daily, weekly, monthly, yearly)
    #[arg(long)]
    pub stage: Option<String>,
    /// New estimated time label
    #[arg(long)]
    pub time: Option<String>,
}

#[derive(Args)]
pub struct BulkArgs {
    /// Action to apply (reviewed, archive, delete)
    pub action: String,
    /// Item IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
}
