use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use birbmeme::{MemePaths, MemePipeline};

#[derive(Parser, Debug)]
#[command(name = "birbmeme", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a meme (or serve it from the artifact cache) and write the PNG.
    Render(RenderArgs),
    /// Print the cache key for a (meme, bird) pair.
    Key(KeyArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Data root containing cache/ and assets/ directories.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Meme configuration id.
    #[arg(long)]
    meme: String,

    /// Bird (subject) id in 0..=9999.
    #[arg(long)]
    bird: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct KeyArgs {
    /// Data root containing cache/ and assets/ directories.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Meme configuration id.
    #[arg(long)]
    meme: String,

    /// Bird (subject) id in 0..=9999.
    #[arg(long)]
    bird: i64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Key(args) => cmd_key(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let pipeline = MemePipeline::new(&MemePaths::from_root(&args.root));

    let artifact = match pipeline.render_or_serve(&args.meme, args.bird) {
        Ok(artifact) => artifact,
        // Clients get one undistinguished not-found for bad subjects, absent
        // memes, and malformed configs alike.
        Err(err) if err.is_not_found() => anyhow::bail!("meme not found"),
        Err(err) => return Err(err.into()),
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &artifact.bytes)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    let key = pipeline.cache_key(&args.meme, args.bird)?;
    eprintln!(
        "wrote {} ({}, key {key}, {})",
        args.out.display(),
        artifact.content_type,
        if artifact.from_cache { "cache hit" } else { "rendered" },
    );
    Ok(())
}

fn cmd_key(args: KeyArgs) -> anyhow::Result<()> {
    let pipeline = MemePipeline::new(&MemePaths::from_root(&args.root));
    let key = match pipeline.cache_key(&args.meme, args.bird) {
        Ok(key) => key,
        Err(err) if err.is_not_found() => anyhow::bail!("meme not found"),
        Err(err) => return Err(err.into()),
    };
    println!("{key}");
    Ok(())
}
