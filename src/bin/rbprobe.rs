//! Binary entry point for the rbprobe tree inspector.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rbprobe::{
    render, GraphDescription, MemoryRead, ProbeError, RenderOptions, Result, SliceReader,
    TreeHandle, TreeSnapshot,
};

#[derive(Parser, Debug)]
#[command(
    name = "rbprobe",
    version,
    about = "Visualize a red-black tree in the memory of a debugged process",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    tree: TreeArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SourceArgs {
    #[arg(
        long,
        global = true,
        help = "Read the address space of a live, stopped process"
    )]
    pid: Option<u32>,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        conflicts_with = "pid",
        help = "Read a saved memory dump instead of a live process"
    )]
    image: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_parser = parse_address,
        requires = "image",
        default_value = "0",
        help = "Address at which the dump file was captured"
    )]
    base: u64,
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[arg(
        long,
        global = true,
        value_parser = parse_address,
        default_value = "0",
        help = "Address of the tree's backing store (hex with 0x prefix, or decimal)"
    )]
    addr: u64,

    #[arg(
        long,
        global = true,
        help = "Treat --addr as the container's pointer field and dereference it"
    )]
    deref: bool,

    #[arg(
        long,
        global = true,
        help = "The container's capacity field, as a sanity bound on the node count"
    )]
    capacity: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture the tree, render it with Graphviz, and open the image.
    View {
        #[arg(long, default_value = "png", help = "Graphviz output format")]
        format: String,

        #[arg(
            long,
            value_name = "PROGRAM",
            default_value = "dot",
            help = "Graphviz layout program to invoke"
        )]
        dot_program: String,

        #[arg(long, help = "Render the image but do not open a viewer")]
        no_view: bool,
    },
    /// Capture the tree and print its dot description to stdout.
    Dot,
    /// Capture the tree and print a snapshot summary.
    Info,
}

fn parse_address(s: &str) -> std::result::Result<u64, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|_| format!("invalid address: {s}"))
}

fn open_reader(source: &SourceArgs) -> Result<Box<dyn MemoryRead>> {
    match (&source.image, source.pid) {
        (Some(image), None) => Ok(Box::new(SliceReader::open(image, source.base)?)),
        #[cfg(unix)]
        (None, Some(pid)) => Ok(Box::new(rbprobe::ProcessReader::attach(pid)?)),
        #[cfg(not(unix))]
        (None, Some(_)) => Err(ProbeError::Render(
            "live process inspection is only available on unix".to_string(),
        )),
        _ => Err(ProbeError::Render(
            "select a memory source with --pid <PID> or --image <FILE>".to_string(),
        )),
    }
}

fn capture(source: &SourceArgs, tree: &TreeArgs) -> Result<TreeSnapshot> {
    let reader = open_reader(source)?;
    let handle = if tree.deref {
        TreeHandle::resolve(reader.as_ref(), tree.addr, tree.capacity)?
    } else {
        TreeHandle {
            base: tree.addr,
            capacity: tree.capacity,
        }
    };
    TreeSnapshot::capture(reader.as_ref(), &handle)
}

fn print_field(name: &str, value: impl std::fmt::Display) {
    println!("  {:.<24} {}", name, value);
}

fn fmt_slot(slot: Option<u64>) -> String {
    match slot {
        Some(i) => i.to_string(),
        None => "-".to_string(),
    }
}

fn cmd_view(snapshot: &TreeSnapshot, options: &RenderOptions) -> Result<()> {
    let graph = GraphDescription::from_snapshot(snapshot)?;
    let image = render(&graph, options)?;
    println!("{}", image.display());
    Ok(())
}

fn cmd_dot(snapshot: &TreeSnapshot) -> Result<()> {
    let graph = GraphDescription::from_snapshot(snapshot)?;
    println!("{graph}");
    Ok(())
}

fn cmd_info(snapshot: &TreeSnapshot) -> Result<()> {
    print_field("Nodes", snapshot.len());
    print_field("Root Slot", fmt_slot(snapshot.meta.root));
    if !snapshot.is_empty() {
        println!();
        println!("  {:>5}  {:>5}  {:>6} {:>6} {:>6}  {:>20}", "slot", "color", "parent", "left", "right", "value");
        for (i, node) in snapshot.nodes.iter().enumerate() {
            let color = if node.red { "red" } else { "black" };
            println!(
                "  {:>5}  {:>5}  {:>6} {:>6} {:>6}  {:>20}",
                i,
                color,
                fmt_slot(node.parent),
                fmt_slot(node.left),
                fmt_slot(node.right),
                node.value
            );
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let snapshot = capture(&cli.source, &cli.tree)?;
    match &cli.command {
        Command::View {
            format,
            dot_program,
            no_view,
        } => cmd_view(
            &snapshot,
            &RenderOptions {
                format: format.clone(),
                dot_program: dot_program.clone(),
                view: !no_view,
            },
        ),
        Command::Dot => cmd_dot(&snapshot),
        Command::Info => cmd_info(&snapshot),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
