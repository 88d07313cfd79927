use bitlet::areas::repository::Repository;
use bitlet::artifacts::core::{PagerWriter, should_page};
use bitlet::errors::{BitletError, ErrorKind};
use clap::{Parser, Subcommand};
use minus::Pager;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "BITLET_LOG";

#[derive(Parser)]
#[command(
    name = "bitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small, local version-control system",
    long_about = "bitlet tracks snapshots of a directory tree in a content-addressed store. \
    It supports branches, three-way merges with conflict markers, \
    and fetching from or pushing to other repositories on the same filesystem.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "DIR",
        help = "Run as if bitlet was started in DIR"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates the .gitlet metadata directory, the initial commit \
        and the master branch in the current directory."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stages the current content of the given files. \
        A file identical to the current commit's version is unstaged instead."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        files: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit from the current commit's snapshot \
        and the staged additions and removals."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "rm",
        about = "Stop tracking a file",
        long_about = "This command unstages a file, or stages its removal and deletes it \
        from the working tree if the current commit tracks it."
    )]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(
        name = "log",
        about = "Show the history of the current branch",
        long_about = "This command shows the current branch's commits, following first parents."
    )]
    Log,
    #[command(
        name = "global-log",
        about = "Show every commit ever made",
        long_about = "This command shows every commit in the object store, in no particular order."
    )]
    GlobalLog,
    #[command(
        name = "find",
        about = "Print the IDs of commits with a given message",
        long_about = "This command prints the ID of every commit whose message is exactly \
        the given one."
    )]
    Find {
        #[arg(index = 1, help = "The commit message to look for")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command lists branches, staged additions and removals, \
        unstaged modifications and untracked files."
    )]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "This command switches to a branch (checkout <branch>), \
        restores a file from the current commit (checkout -- <file>) \
        or restores a file from another commit (checkout <commit> -- <file>)."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch to switch to, or the commit to restore from")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(
        name = "branch",
        about = "Create a branch at the current commit",
        long_about = "This command creates a new branch pointing at the current commit \
        without switching to it."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the new branch")]
        name: String,
    },
    #[command(
        name = "rm-branch",
        about = "Delete a branch",
        long_about = "This command deletes a branch pointer. The commits made on it are kept."
    )]
    RmBranch {
        #[arg(index = 1, help = "The branch to delete")]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Move the current branch to a commit",
        long_about = "This command checks out the given commit's files and moves the \
        current branch to it. Abbreviated commit IDs are accepted."
    )]
    Reset {
        #[arg(index = 1, help = "The commit to reset to")]
        commit: String,
    },
    #[command(
        name = "merge",
        about = "Merge a branch into the current one",
        long_about = "This command merges the given branch into the current branch, \
        fast-forwarding when possible and writing conflict markers where both sides changed."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
    #[command(
        name = "add-remote",
        about = "Register a remote repository",
        long_about = "This command stores the location of another repository under a name."
    )]
    AddRemote {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
        #[arg(index = 2, help = "The remote's directory (or its .gitlet directory)")]
        location: String,
    },
    #[command(
        name = "rm-remote",
        about = "Forget a remote repository",
        long_about = "This command removes a registered remote."
    )]
    RmRemote {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
    },
    #[command(
        name = "fetch",
        about = "Copy a remote branch into <remote>/<branch>",
        long_about = "This command copies the history of a remote branch and points the local \
        branch <remote>/<branch> at its tip."
    )]
    Fetch {
        #[arg(index = 1, help = "The name of the remote")]
        remote: String,
        #[arg(index = 2, help = "The remote branch")]
        branch: String,
    },
    #[command(
        name = "push",
        about = "Send the current branch to a remote branch",
        long_about = "This command copies the current branch's history to the remote and \
        moves the remote branch, as long as that is a fast-forward."
    )]
    Push {
        #[arg(index = 1, help = "The name of the remote")]
        remote: String,
        #[arg(index = 2, help = "The remote branch")]
        branch: String,
    },
    #[command(
        name = "pull",
        about = "Fetch a remote branch and merge it",
        long_about = "This command fetches <remote>/<branch> and merges it into the current branch."
    )]
    Pull {
        #[arg(index = 1, help = "The name of the remote")]
        remote: String,
        #[arg(index = 2, help = "The remote branch")]
        branch: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command prints the blob ID of a file and, with -w, stores the blob."
    )]
    HashObject {
        #[arg(short, long, required = false, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints a stored blob's content or a commit's stored text. \
        Abbreviated object IDs are accepted."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object SHA to print")]
        sha: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => report(error),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pwd = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };
    let pwd = pwd.to_string_lossy();

    let pager = (matches!(cli.command, Commands::Log | Commands::GlobalLog) && should_page())
        .then(Pager::new);
    let writer: Box<dyn std::io::Write> = match &pager {
        Some(pager) => Box::new(PagerWriter::new(pager.clone())),
        None => Box::new(std::io::stdout()),
    };

    let mut repository = Repository::new(&pwd, writer)?;

    match cli.command {
        Commands::Init => repository.init().await?,
        Commands::Add { files } => repository.add(&files).await?,
        Commands::Commit { message } => {
            repository.commit(&message).await?;
        }
        Commands::Rm { file } => repository.rm(&file).await?,
        Commands::Log => repository.log().await?,
        Commands::GlobalLog => repository.global_log().await?,
        Commands::Find { message } => {
            repository.find(&message).await?;
        }
        Commands::Status => {
            repository.status().await?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(&branch).await?,
            (revision, Some(file)) => repository.checkout_file(revision.as_deref(), &file).await?,
            (None, None) => return Err(BitletError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.branch(&name).await?,
        Commands::RmBranch { name } => repository.rm_branch(&name).await?,
        Commands::Reset { commit } => {
            repository.reset(&commit).await?;
        }
        Commands::Merge { branch } => {
            repository.merge(&branch).await?;
        }
        Commands::AddRemote { name, location } => repository.add_remote(&name, &location).await?,
        Commands::RmRemote { name } => repository.rm_remote(&name).await?,
        Commands::Fetch { remote, branch } => {
            repository.fetch(&remote, &branch).await?;
        }
        Commands::Push { remote, branch } => repository.push(&remote, &branch).await?,
        Commands::Pull { remote, branch } => {
            repository.pull(&remote, &branch).await?;
        }
        Commands::HashObject { write, file } => {
            repository.hash_object(&file, write).await?;
        }
        Commands::CatFile { sha } => repository.cat_file(&sha).await?,
    }

    // drop the repository first so the pager holds the complete output
    drop(repository);
    if let Some(pager) = pager {
        minus::page_all(pager)?;
    }

    Ok(())
}

/// Domain errors are reported on stdout; only usage errors and failures of the
/// environment (I/O, corrupt metadata) end with a non-zero exit status
fn report(error: anyhow::Error) -> ExitCode {
    match BitletError::find(&error) {
        Some(domain_error) => {
            println!("{domain_error}");
            tracing::debug!(error = ?error, "command failed");

            if domain_error.kind() == ErrorKind::Usage {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        None => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
