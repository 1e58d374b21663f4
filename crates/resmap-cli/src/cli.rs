use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "resmap",
    about = "Browse and edit resource map tag hierarchies",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace id (falls back to RESMAP_WORKSPACE_ID)
    #[arg(short, long, global = true)]
    pub workspace: Option<String>,

    /// Tag type: location, business-unit, or role
    #[arg(short = 't', long = "type", global = true, default_value = "location")]
    pub tag_type: String,

    /// Maximum hierarchy depth (falls back to RESMAP_MAX_DEPTH, then 10)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tag tree
    Tree(TreeArgs),
    /// Create a tag
    Create(CreateArgs),
    /// Change a tag's value
    Rename(RenameArgs),
    /// Move a tag under another tag, or to root
    Move(MoveArgs),
    /// Delete a tag
    Delete(DeleteArgs),
    /// Report hierarchy problems in the fetched list
    Check,
    /// List the tags a tag could be moved under
    Parents(ParentsArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Tree(_) => "tree",
            Commands::Create(_) => "create",
            Commands::Rename(_) => "rename",
            Commands::Move(_) => "move",
            Commands::Delete(_) => "delete",
            Commands::Check => "check",
            Commands::Parents(_) => "parents",
        }
    }
}

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Start with every node collapsed
    #[arg(long)]
    pub collapsed: bool,

    /// Collapse this tag (repeatable)
    #[arg(long = "collapse", value_name = "ID")]
    pub collapse: Vec<String>,

    /// Expand every ancestor of this tag (repeatable)
    #[arg(long = "reveal", value_name = "ID")]
    pub reveal: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display value of the new tag
    pub value: String,

    /// Parent tag id
    #[arg(long, value_name = "ID")]
    pub parent: Option<String>,

    /// Latitude (location tags only)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude (location tags only)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Plus code (location tags only)
    #[arg(long, conflicts_with_all = ["lat", "lng"])]
    pub plus_code: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    pub id: String,
    pub value: String,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Tag to move
    pub id: String,

    /// New parent
    #[arg(long, value_name = "ID", required_unless_present = "root")]
    pub under: Option<String>,

    /// Move to root level
    #[arg(long, conflicts_with = "under")]
    pub root: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub id: String,

    /// Ask the store to remove descendants too
    #[arg(long)]
    pub cascade: bool,
}

#[derive(Args, Debug)]
pub struct ParentsArgs {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "resmap", "tree", "--type", "role", "-w", "ws-1", "--max-depth", "4",
        ])
        .unwrap();
        assert_eq!(cli.tag_type, "role");
        assert_eq!(cli.workspace.as_deref(), Some("ws-1"));
        assert_eq!(cli.max_depth, Some(4));
        assert_eq!(cli.command.name(), "tree");
    }

    #[test]
    fn test_move_requires_target_or_root() {
        assert!(Cli::try_parse_from(["resmap", "move", "a"]).is_err());
        assert!(Cli::try_parse_from(["resmap", "move", "a", "--root", "--under", "b"]).is_err());

        let cli = Cli::try_parse_from(["resmap", "move", "a", "--root"]).unwrap();
        match cli.command {
            Commands::Move(args) => {
                assert!(args.root);
                assert!(args.under.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_create_with_coordinates() {
        let cli = Cli::try_parse_from([
            "resmap", "create", "Dock", "--parent", "yard", "--lat", "30.2", "--lng", "-97.7",
        ])
        .unwrap();
        match cli.command {
            Commands::Create(args) => {
                assert_eq!(args.parent.as_deref(), Some("yard"));
                assert_eq!(args.lat, Some(30.2));
                assert_eq!(args.lng, Some(-97.7));
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["resmap", "create", "Dock", "--lat", "30.2"]).is_err());
    }
}
