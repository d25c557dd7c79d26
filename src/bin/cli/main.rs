//! Command-line interface for UCF containers.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ucf::{Container, DEFAULT_MIMETYPE};

#[derive(Parser)]
#[command(name = "ucf", version, about = "Create, inspect, and verify UCF containers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new container with only its mimetype entry
    Create {
        /// Path of the container to create
        path: PathBuf,
        /// Mimetype string to embed
        #[arg(long, default_value = DEFAULT_MIMETYPE)]
        mimetype: String,
    },
    /// Verify a container's structure and managed entries
    Verify {
        /// Path of the container to verify
        path: PathBuf,
        /// Print the first failure instead of just the verdict
        #[arg(long)]
        strict: bool,
    },
    /// List the entries of a container
    List {
        /// Path of the container
        path: PathBuf,
    },
    /// Print the contents of one entry to stdout
    Read {
        /// Path of the container
        path: PathBuf,
        /// Entry name to read
        entry: String,
    },
    /// Add a file to a container
    Add {
        /// Path of the container
        path: PathBuf,
        /// Entry name to create
        entry: String,
        /// File whose contents to add
        source: PathBuf,
    },
    /// Remove an entry from a container
    Remove {
        /// Path of the container
        path: PathBuf,
        /// Entry name to remove
        entry: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> ucf::Result<ExitCode> {
    match cli.command {
        Command::Create { path, mimetype } => {
            let container = Container::create_with_mimetype(&path, &mimetype)?;
            println!("created {}", container);
            container.close()?;
        }
        Command::Verify { path, strict } => {
            if strict {
                if let Err(e) = Container::verify_strict(&path) {
                    eprintln!("{}: {}", path.display(), e);
                    return Ok(ExitCode::FAILURE);
                }
                println!("{}: ok", path.display());
            } else if Container::verify(&path) {
                println!("{}: ok", path.display());
            } else {
                println!("{}: invalid", path.display());
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::List { path } => {
            let container = Container::open(&path)?;
            println!("{}", container);
            for entry in container.entries() {
                if entry.is_dir {
                    println!("  {}", entry.name);
                } else {
                    println!("  {} ({} bytes)", entry.name, entry.size);
                }
            }
        }
        Command::Read { path, entry } => {
            let mut container = Container::open(&path)?;
            let contents = container.read(&entry)?;
            std::io::stdout().write_all(&contents)?;
        }
        Command::Add {
            path,
            entry,
            source,
        } => {
            let mut container = Container::open(&path)?;
            container.add_path(&entry, &source)?;
            container.close()?;
            println!("added {}", entry);
        }
        Command::Remove { path, entry } => {
            let mut container = Container::open(&path)?;
            container.remove(&entry)?;
            container.close()?;
            println!("removed {}", entry);
        }
    }
    Ok(ExitCode::SUCCESS)
}
