use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use kairo::prelude::*;
use std::fs;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect, validate, convert and edit saved behaviour graphs
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a summary of every item in a snapshot
    Inspect {
        /// Path to the snapshot JSON file
        snapshot: String,
    },
    /// Rebuild a workspace from a snapshot and check every invariant
    Validate {
        /// Path to the snapshot JSON file
        snapshot: String,
        /// Optional type rules JSON (`{ "converters": [["int", "number"], ...] }`)
        #[arg(short, long)]
        rules: Option<String>,
    },
    /// Convert a snapshot JSON file into a binary artifact
    Pack {
        snapshot: String,
        #[arg(short, long, default_value = "snapshot.bin")]
        output: String,
    },
    /// Convert a binary artifact back into snapshot JSON
    Unpack {
        artifact: String,
        #[arg(short, long, default_value = "snapshot.json")]
        output: String,
    },
    /// Apply a JSON list of actions to a snapshot and write the result
    Apply(ApplyArgs),
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kairo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect { snapshot } => run_inspect(&snapshot),
        Command::Validate { snapshot, rules } => run_validate(&snapshot, rules.as_deref()),
        Command::Pack { snapshot, output } => run_pack(&snapshot, &output),
        Command::Unpack { artifact, output } => run_unpack(&artifact, &output),
        Command::Apply(args) => run_apply(args),
    }
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Path to the snapshot JSON file
    snapshot: String,
    /// Path to a JSON array of actions
    actions: String,
    /// Template registry JSON (an object of template id -> definition)
    #[arg(short, long)]
    templates: Option<String>,
    /// Project resources JSON (an array of resources)
    #[arg(long)]
    resources: Option<String>,
    /// Id of the container being edited, enabling the instance cycle guard
    #[arg(short, long)]
    container: Option<String>,
    #[arg(short, long, default_value = "snapshot.json")]
    output: String,
}

fn read_file(path: &str, what: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read {} file '{}': {}", what, path, e)))
}

fn load_snapshot(path: &str) -> WorkspaceSnapshot {
    WorkspaceSnapshot::from_json(&read_file(path, "snapshot"))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse '{}': {}", path, e)))
}

fn load_rules(path: Option<&str>) -> TypeRules {
    match path {
        Some(path) => serde_json::from_str(&read_file(path, "rules"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse rules '{}': {}", path, e))),
        None => TypeRules::default(),
    }
}

fn write_file(path: &str, contents: &str) {
    fs::write(path, contents)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
}

fn describe(item: &CanvasItem) -> String {
    let position = item
        .position()
        .map_or(String::new(), |p| format!(" at ({}, {})", p.left(), p.top()));
    match item {
        CanvasItem::Behaviour(b) => {
            let portals = b
                .portals()
                .iter()
                .map(|p| format!("{}:{}:{}", p.name(), p.kind(), p.data_type()))
                .join(", ");
            let kind = if b.is_instance() { "instance" } else { "behaviour" };
            format!("{} {} '{}'{} [{}]", item.id(), kind, b.alias, position, portals)
        }
        CanvasItem::Portal(p) => format!(
            "{} portal '{}' ({} {}){}",
            item.id(),
            p.name(),
            p.portal.kind(),
            p.portal.data_type(),
            position
        ),
        CanvasItem::Link(l) => format!("{} link {} -> {}", item.id(), l.source, l.target),
        CanvasItem::Comment(c) => format!("{} comment{} \"{}\"", item.id(), position, c.text),
    }
}

fn run_inspect(path: &str) {
    let workspace = Workspace::from_snapshot(load_snapshot(path), TypeRules::default())
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid snapshot: {}", e)));

    println!("--- {} ---", path);
    for item in workspace.items() {
        println!("  {}", describe(item));
    }

    let counts = workspace
        .items()
        .iter()
        .map(CanvasItem::kind_name)
        .counts()
        .into_iter()
        .sorted()
        .map(|(kind, n)| format!("{} {}", n, kind))
        .join(", ");
    println!("\n{} items: {}", workspace.len(), counts);
}

fn run_validate(path: &str, rules: Option<&str>) {
    let rules = load_rules(rules);
    let workspace = Workspace::from_snapshot(load_snapshot(path), rules)
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    workspace
        .check_invariants()
        .unwrap_or_else(|e| exit_with_error(&format!("Validation failed: {}", e)));
    println!("'{}' is valid ({} items, {} links)", path, workspace.len(), workspace.links().count());
}

fn run_pack(path: &str, output: &str) {
    let snapshot = load_snapshot(path);
    // Refuse to pack something that would not load back.
    if let Err(e) = Workspace::from_snapshot(snapshot.clone(), TypeRules::default()) {
        exit_with_error(&format!("Refusing to pack an invalid snapshot: {}", e));
    }
    let artifact = SnapshotArtifact::from(snapshot);
    artifact
        .save(output)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
    println!("Packed {} items into '{}'", artifact.len(), output);
}

fn run_unpack(path: &str, output: &str) {
    let artifact = SnapshotArtifact::from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load artifact: {}", e)));
    let json = artifact
        .into_snapshot()
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize snapshot: {}", e)));
    write_file(output, &json);
    println!("Unpacked '{}' into '{}'", path, output);
}

fn run_apply(args: ApplyArgs) {
    let start = Instant::now();
    let workspace = Workspace::from_snapshot(load_snapshot(&args.snapshot), TypeRules::default())
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid snapshot: {}", e)));
    let actions: Vec<Action> = serde_json::from_str(&read_file(&args.actions, "actions"))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse actions: {}", e)));

    let mut builder = Editor::builder().with_workspace(workspace);
    if let Some(path) = &args.templates {
        let templates: MemoryTemplates = serde_json::from_str(&read_file(path, "templates"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse templates: {}", e)));
        builder = builder.with_templates(templates);
    }
    if let Some(path) = &args.resources {
        let resources = MemoryResources::from_json(&read_file(path, "resources"))
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse resources: {}", e)));
        builder = builder.with_resources(resources);
    }
    if let Some(container) = args.container {
        builder = builder.with_container(container);
    }
    let mut editor = builder.build();

    let total = actions.len();
    for (index, action) in actions.into_iter().enumerate() {
        let label = action.kind();
        match editor.do_action(action) {
            Ok(Some(id)) => info!(index, action = label, item = %id, "applied"),
            Ok(None) => info!(index, action = label, "applied"),
            Err(e) => exit_with_error(&format!("Action {} ({}) failed: {}", index, label, e)),
        }
    }

    let json = editor
        .workspace()
        .to_snapshot()
        .to_json()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize snapshot: {}", e)));
    write_file(&args.output, &json);

    println!(
        "Applied {} action(s) in {:?} ({} recorded); wrote {} items to '{}'",
        total,
        start.elapsed(),
        editor.history().undo_len(),
        editor.workspace().len(),
        args.output
    );
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
