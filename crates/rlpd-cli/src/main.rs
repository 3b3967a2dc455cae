use clap::{Args as ClapArgs, Parser, Subcommand};
use rlpd_core::{EditError, EditorOptions, NodeId, Notification, Representation, RootController};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rlpd-cli",
    about = "Decode, inspect and edit RLP-encoded values",
    version
)]
struct Cli {
    /// Log every edit and notification (same as RUST_LOG=debug)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the decoded tree
    Dump(DumpArgs),
    /// Print all four views of a leaf
    View(PtrArgs),
    /// Edit a leaf's text in a representation; prints the new wire text
    Set(SetArgs),
    /// Switch a leaf's representation; prints the new wire text
    Select(SelectArgs),
    /// Insert a placeholder leaf after the node
    Insert(PtrArgs),
    /// Remove the node from its parent list
    Remove(PtrArgs),
    /// Replace a leaf with a singleton list containing it
    Wrap(PtrArgs),
    /// Append a placeholder leaf to a list
    Append(PtrArgs),
    /// Insert a placeholder leaf at the head of a list
    Head(PtrArgs),
}

#[derive(ClapArgs, Debug)]
struct Source {
    /// RLP wire text as hex (whitespace and 0x prefix optional)
    input: Option<String>,
    /// Read the wire text from a file instead
    #[arg(long, value_name = "PATH", conflicts_with = "input")]
    file: Option<PathBuf>,
    /// Bytes per group in the hex view (0 = no grouping)
    #[arg(long, default_value_t = 4)]
    group: usize,
    /// Allow control characters in the UTF-8 view
    #[arg(long, default_value_t = false)]
    allow_control: bool,
}

#[derive(ClapArgs, Debug)]
struct DumpArgs {
    #[command(flatten)]
    src: Source,
    /// Emit the full node snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ClapArgs, Debug)]
struct PtrArgs {
    #[command(flatten)]
    src: Source,
    /// Node pointer, e.g. /0/2 (empty for the root)
    #[arg(long, default_value = "")]
    ptr: String,
}

#[derive(ClapArgs, Debug)]
struct SetArgs {
    #[command(flatten)]
    target: PtrArgs,
    /// Representation the text is written in: hex, utf8, uint, timestamp
    #[arg(long, default_value = "hex")]
    repr: Representation,
    /// New text for the leaf
    #[arg(long)]
    text: String,
}

#[derive(ClapArgs, Debug)]
struct SelectArgs {
    #[command(flatten)]
    target: PtrArgs,
    /// Representation to switch to: hex, utf8, uint, timestamp
    #[arg(long)]
    repr: Representation,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Cmd::Dump(a) => cmd_dump(a),
        Cmd::View(a) => cmd_view(a),
        Cmd::Set(a) => {
            let (repr, text) = (a.repr, a.text);
            cmd_edit(a.target, |c, id| {
                c.select(id, repr)?;
                c.edit_text(id, &text)
            })
        }
        Cmd::Select(a) => {
            let repr = a.repr;
            cmd_edit(a.target, |c, id| c.select(id, repr))
        }
        Cmd::Insert(a) => cmd_edit(a, |c, id| c.insert_after(id)),
        Cmd::Remove(a) => cmd_edit(a, |c, id| c.remove(id)),
        Cmd::Wrap(a) => cmd_edit(a, |c, id| c.wrap_into_list(id)),
        Cmd::Append(a) => cmd_edit(a, |c, id| c.append(id)),
        Cmd::Head(a) => cmd_edit(a, |c, id| c.insert_at_head(id)),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn options(src: &Source) -> EditorOptions {
    EditorOptions {
        hex_group_bytes: src.group,
        reject_control_chars: !src.allow_control,
        ..EditorOptions::default()
    }
}

fn load(src: &Source) -> RootController {
    let text = match (&src.input, &src.file) {
        (_, Some(path)) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("error reading {}: {}", path.display(), e);
            std::process::exit(2);
        }),
        (Some(s), None) => s.clone(),
        (None, None) => {
            eprintln!("error: no wire text given (pass it as an argument or use --file)");
            std::process::exit(2);
        }
    };
    let mut c = RootController::new(options(src));
    let decoded = c.set_input(&text).and_then(|_| c.enter_decoded());
    if decoded.is_err() {
        eprintln!("error: {}", c.decode_control().label);
        std::process::exit(2);
    }
    c
}

fn resolve(c: &RootController, ptr: &str) -> NodeId {
    match c.tree().and_then(|t| t.resolve(ptr)) {
        Some(id) => id,
        None => {
            eprintln!("not found: {}", ptr);
            std::process::exit(3);
        }
    }
}

fn cmd_dump(args: DumpArgs) {
    let c = load(&args.src);
    let Some(tree) = c.tree() else {
        std::process::exit(2);
    };
    if args.json {
        match serde_json::to_string_pretty(&tree.snapshot()) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(2);
            }
        }
    } else if let Some(v) = tree.value() {
        print!("{}", v);
    }
}

fn cmd_view(args: PtrArgs) {
    let c = load(&args.src);
    let id = resolve(&c, &args.ptr);
    let Some(tree) = c.tree() else {
        std::process::exit(2);
    };
    match tree.leaf(id) {
        Ok(leaf) => {
            for (repr, text) in leaf.views().iter() {
                println!("{}\t{}", repr, text.unwrap_or("<none>"));
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(4);
        }
    }
}

fn cmd_edit<F>(args: PtrArgs, op: F)
where
    F: FnOnce(&mut RootController, NodeId) -> Result<Notification, EditError>,
{
    let mut c = load(&args.src);
    let id = resolve(&c, &args.ptr);
    if let Err(e) = op(&mut c, id) {
        eprintln!("error: {}", e);
        std::process::exit(4);
    }
    let control = c.encode_control();
    if !control.enabled {
        eprintln!("error: {}", control.label);
        std::process::exit(5);
    }
    println!("{}", c.wire_text().unwrap_or_default());
}
