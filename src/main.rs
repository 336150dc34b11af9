use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "hanas")]
#[command(about = "Command-line client for the HaNas remote file store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to a HaNas server and store the session settings
    Login {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Create the account instead of logging in to an existing one
        #[arg(long)]
        register: bool,
    },
    /// End the session and remove the stored settings
    Logout,
    /// List a folder, the root when no id is given
    Ls {
        id: Option<i64>,
        /// Refetch from the server even if cached
        #[arg(long)]
        refresh: bool,
        /// Render loaded subfolders as an indented tree
        #[arg(long)]
        tree: bool,
    },
    /// Create a folder
    Mkdir {
        name: String,
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Upload a local file
    Upload {
        path: PathBuf,
        #[arg(long)]
        parent: Option<i64>,
    },
    /// Download a file by node id
    Download {
        id: i64,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Delete a node
    Rm { id: i64 },
    /// Rename a node
    Rename { id: i64, new_name: String },
    /// Move a node into another folder
    Mv {
        id: i64,
        dest: i64,
        #[arg(long)]
        overwrite: bool,
    },
    /// Copy a node into another folder
    Cp {
        id: i64,
        dest: i64,
        #[arg(long)]
        overwrite: bool,
    },
    /// Create a public share link for a node
    Share { id: i64 },
    /// Revoke a node's share link
    Unshare { id: i64 },
    /// Show details and access URLs for a node
    Info { id: i64 },
    /// Show the logged-in user
    Whoami,
    /// Permanently delete the account and all its files
    DeleteAccount,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Login {
            server,
            username,
            register,
        } => commands::login::run(server, username, register).await,
        Commands::Logout => commands::login::run_logout().await,
        Commands::Ls { id, refresh, tree } => commands::ls::run(id, refresh, tree).await,
        Commands::Mkdir { name, parent } => commands::manage::run_mkdir(&name, parent).await,
        Commands::Upload { path, parent } => commands::transfer::run_upload(&path, parent).await,
        Commands::Download { id, output } => commands::transfer::run_download(id, output).await,
        Commands::Rm { id } => commands::manage::run_rm(id).await,
        Commands::Rename { id, new_name } => commands::manage::run_rename(id, &new_name).await,
        Commands::Mv {
            id,
            dest,
            overwrite,
        } => commands::manage::run_move(id, dest, overwrite).await,
        Commands::Cp {
            id,
            dest,
            overwrite,
        } => commands::manage::run_copy(id, dest, overwrite).await,
        Commands::Share { id } => commands::share::run_share(id).await,
        Commands::Unshare { id } => commands::share::run_unshare(id).await,
        Commands::Info { id } => commands::info::run_info(id).await,
        Commands::Whoami => commands::info::run_whoami().await,
        Commands::DeleteAccount => commands::login::run_delete_account().await,
    }
}
