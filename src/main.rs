use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use fileshelf::{Content, Directories, Download, FileService};

#[derive(Parser, Debug)]
#[command(author, version, about = "Test host for the fileshelf library service", long_about = None)]
struct Args {
    /// Root of the library tree being served.
    #[arg(long, default_value = "data/files/library")]
    library: PathBuf,

    /// Scratch directory for in-flight chunked uploads.
    #[arg(long, default_value = "data/files/temp")]
    temp: PathBuf,

    /// Treat the caller as privileged (hidden entries become visible).
    #[arg(long)]
    privileged: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List a directory (or describe a file) as a JSON payload.
    List {
        #[arg(default_value = "")]
        path: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// 0 disables pagination.
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Report whether a path names a file, a directory, or nothing.
    Type { path: String },

    /// Create a folder under the given parent path.
    Mkdir {
        #[arg(long, default_value = "")]
        parent: String,
        name: String,
    },

    /// Bundle one or more paths into a zip, or copy out a single file.
    Bundle {
        #[arg(required = true)]
        paths: Vec<String>,

        /// Where to write the zip (or single file).
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let service = FileService::new(Directories::new(args.library, args.temp));

    match args.command {
        Commands::List {
            path,
            page,
            page_size,
        } => match service.get_content(&path, page, page_size, args.privileged)? {
            Content::File {
                data,
                content_type,
                file_name,
            } => {
                eprintln!(
                    "[fileshelf] {file_name} ({content_type}, {} bytes)",
                    data.len()
                );
            }
            Content::Directory(listing) => {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            }
            Content::Missing => bail!("not found: {path:?}"),
        },

        Commands::Type { path } => {
            println!("{}", service.get_type(&path)?);
        }

        Commands::Mkdir { parent, name } => {
            service
                .create_folder(&parent, &name)
                .with_context(|| format!("creating folder {name:?} under {parent:?}"))?;
            eprintln!("[fileshelf] ✓ created {parent}/{name}");
        }

        Commands::Bundle { paths, output } => {
            match service.download(&paths, args.privileged)? {
                Download::File {
                    data, file_name, ..
                } => {
                    std::fs::write(&output, data)
                        .with_context(|| format!("writing {}", output.display()))?;
                    eprintln!("[fileshelf] ✓ wrote {file_name} to {}", output.display());
                }
                Download::Archive(bundle) => {
                    let file = File::create(&output)
                        .with_context(|| format!("creating {}", output.display()))?;
                    bundle.write_to(file)?;
                    eprintln!(
                        "[fileshelf] ✓ wrote {} entries to {} (suggested name {})",
                        bundle.entries().len(),
                        output.display(),
                        bundle.file_name()
                    );
                }
            }
        }
    }

    Ok(())
}
