use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use layerscope::{
    CaptureReader, CommandKind, InMemorySink, Session, SessionOpts, encode_command, export,
};

#[derive(Parser, Debug)]
#[command(name = "layerscope", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a capture and print per-frame counts.
    Summary(SummaryArgs),
    /// Decode a capture and write frames and images to a directory.
    Export(ExportArgs),
    /// Write an encoded command packet.
    Command(CommandArgs),
}

#[derive(Parser, Debug)]
struct SummaryArgs {
    /// Capture file (`[u32 le length][packet]` records).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Skip display-list parsing.
    #[arg(long, default_value_t = false)]
    no_display_lists: bool,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Capture file (`[u32 le length][packet]` records).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output archive directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CommandKindArg {
    Tree,
    Buffer,
}

#[derive(Parser, Debug)]
struct CommandArgs {
    #[arg(long, value_enum)]
    kind: CommandKindArg,

    #[arg(long, action = clap::ArgAction::Set)]
    value: bool,

    /// Output file for the packet bytes.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Summary(args) => cmd_summary(args),
        Command::Export(args) => cmd_export(args),
        Command::Command(args) => cmd_command(args),
    }
}

fn decode_capture(in_path: &Path, opts: SessionOpts) -> anyhow::Result<Session<InMemorySink>> {
    let file =
        File::open(in_path).with_context(|| format!("open capture '{}'", in_path.display()))?;
    let mut session = Session::new(InMemorySink::new(), opts);
    session.begin();
    for packet in CaptureReader::new(BufReader::new(file)) {
        let packet = packet.with_context(|| format!("read capture '{}'", in_path.display()))?;
        session.push(&packet)?;
    }
    Ok(session)
}

fn cmd_summary(args: SummaryArgs) -> anyhow::Result<()> {
    let opts = SessionOpts {
        parse_display_lists: !args.no_display_lists,
        ..SessionOpts::default()
    };
    let session = decode_capture(&args.in_path, opts)?;

    for frame in &session.sink().frames {
        println!(
            "frame {:>20}  colors {:>4}  textures {:>4}  layers {:>4}  draws {:>4}",
            frame.id,
            frame.colors.len(),
            frame.texture_nodes.len(),
            frame.layer_count(),
            frame.draws.len()
        );
    }

    let stats = session.stats();
    println!(
        "{} frames, {} packets, {} decode failures, {} unknown, {} textures dropped, {} images",
        stats.frames_emitted,
        stats.packets_processed,
        stats.decode_failures,
        stats.unknown_packets,
        stats.textures_dropped,
        session.assembler().cache().len()
    );
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let session = decode_capture(&args.in_path, SessionOpts::default())?;
    let (sink, assembler) = session.into_parts();
    export(&args.out, &sink.frames, assembler.cache())?;
    eprintln!(
        "wrote {} frames to {}",
        sink.frames.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_command(args: CommandArgs) -> anyhow::Result<()> {
    let kind = match args.kind {
        CommandKindArg::Tree => CommandKind::LayersTree,
        CommandKindArg::Buffer => CommandKind::LayersBuffer,
    };
    let bytes = encode_command(kind, args.value);

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, &bytes)
        .with_context(|| format!("write command '{}'", args.out.display()))?;
    eprintln!("wrote {} bytes to {}", bytes.len(), args.out.display());
    Ok(())
}
