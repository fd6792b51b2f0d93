use anyhow::Result;
use bitclone::areas::repository::Repository;
use bitclone::artifacts::core::config::{DEFAULT_MAX_TREE_DEPTH, FetchConfig};
use bitclone::artifacts::core::logging::init_tracing;
use bitclone::commands::plumbing::cat_file::CatFileMode;
use bitclone::commands::plumbing::ls_tree::LsTreeOptions;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "bitclone",
    version,
    about = "A small git that can clone over smart HTTP",
    long_about = "This is a small implementation of git's object store and fetch path, written in Rust. \
    It can hash and inspect loose objects, write trees and commits, \
    and clone a repository from a smart HTTP remote.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v info, -vv debug, -vvv trace)")]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content or type of an object"
    )]
    CatFile {
        #[arg(short = 'p', conflicts_with = "show_type", help = "Pretty-print the object's content")]
        pretty: bool,
        #[arg(short = 't', id = "show_type", help = "Print the object's type")]
        show_type: bool,
        #[arg(index = 1, help = "The object SHA")]
        sha: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as a blob and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the contents of a tree object",
        long_about = "This command lists the entries of a tree. A commit SHA or HEAD lists the commit's root tree."
    )]
    LsTree {
        #[arg(short = 'r', help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(long, help = "List only file names")]
        name_only: bool,
        #[arg(index = 1, help = "Tree or commit SHA, or HEAD")]
        tree_ish: String,
    },
    #[command(
        name = "write-tree",
        about = "Create tree objects from the working directory"
    )]
    WriteTree,
    #[command(
        name = "commit-tree",
        about = "Create a commit object for a tree",
        long_about = "This command creates a commit for the given tree. \
        The author is read from GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and optionally GIT_AUTHOR_DATE."
    )]
    CommitTree {
        #[arg(index = 1, help = "The tree SHA")]
        tree: String,
        #[arg(short = 'p', help = "A parent commit SHA (repeatable)")]
        parents: Vec<String>,
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "clone",
        about = "Clone a repository over smart HTTP",
        long_about = "This command fetches every ref the remote advertises and checks out the head commit into the target directory."
    )]
    Clone {
        #[arg(index = 1, help = "The remote URL")]
        url: String,
        #[arg(index = 2, help = "The directory to clone into")]
        directory: PathBuf,
        #[arg(long, env = "BITCLONE_HTTP_TIMEOUT", help = "HTTP request timeout in seconds")]
        timeout: Option<u64>,
        #[arg(long, env = "BITCLONE_MAX_TREE_DEPTH", default_value_t = DEFAULT_MAX_TREE_DEPTH, help = "Deepest directory nesting to check out")]
        max_depth: usize,
    },
}

fn open_current() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd, Box::new(std::io::stdout()))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            let mut repository = Repository::new(&path, Box::new(std::io::stdout()))?;

            repository.init()?
        }
        Commands::CatFile {
            pretty: _,
            show_type,
            sha,
        } => {
            let mode = match show_type {
                true => CatFileMode::Type,
                false => CatFileMode::Pretty,
            };

            open_current()?.cat_file(&sha, mode)?
        }
        Commands::HashObject { write, file } => open_current()?.hash_object(&file, write)?,
        Commands::LsTree {
            recursive,
            name_only,
            tree_ish,
        } => open_current()?.ls_tree(
            &tree_ish,
            LsTreeOptions {
                recursive,
                name_only,
            },
        )?,
        Commands::WriteTree => open_current()?.write_tree()?,
        Commands::CommitTree {
            tree,
            parents,
            message,
        } => open_current()?.commit_tree(&tree, &parents, &message)?,
        Commands::Clone {
            url,
            directory,
            timeout,
            max_depth,
        } => {
            let config = FetchConfig::default()
                .with_timeout_secs(timeout)
                .with_max_tree_depth(max_depth);
            let mut repository = Repository::new(&directory, Box::new(std::io::stdout()))?;

            repository.clone_remote(&url, &config).await?
        }
    }

    Ok(())
}
