use clap::Parser;
use kairo::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A CLI tool to generate random, valid behaviour graphs for Kairo
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated snapshot JSON to
    #[arg(short, long, default_value = "generated_snapshot.json")]
    output: String,

    /// Also write a binary artifact to this path
    #[arg(long)]
    artifact: Option<String>,

    /// The minimum number of behaviours to place
    #[arg(long, default_value_t = 4)]
    min: usize,

    /// The maximum number of behaviours to place
    #[arg(long, default_value_t = 24)]
    max: usize,

    /// How many link attempts to make per behaviour
    #[arg(long, default_value_t = 2)]
    link_attempts: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kairo_gen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Add validation to ensure min is not greater than max
    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "Generating a new behaviour graph (behaviours: {} to {})...",
        cli.min, cli.max
    );

    let mut editor = Editor::builder().with_templates(palette()).build();
    let template_ids = ["timer", "log", "scale", "tween", "branch"];

    place_container_portals(&mut editor)?;

    let count = rng.random_range(cli.min..=cli.max);
    let mut behaviours = Vec::with_capacity(count);
    for _ in 0..count {
        let template = template_ids[rng.random_range(0..template_ids.len())];
        let x = rng.random_range(0..1600);
        let y = rng.random_range(0..1200);
        if let Some(id) = editor.do_action(Action::CreateBehaviour {
            template: template.into(),
            x,
            y,
        })? {
            behaviours.push(id);
        }
    }
    println!("-> Placed {} behaviour(s).", behaviours.len());

    let links = generate_links(&mut editor, &mut rng, &behaviours, cli.link_attempts);
    println!("-> Created {} link(s).", links);

    let comments = rng.random_range(0..=3);
    for n in 0..comments {
        editor.do_action(Action::CreateComment {
            text: format!("Note {}", n + 1),
            x: rng.random_range(0..1600),
            y: rng.random_range(0..1200),
        })?;
    }

    editor.workspace().check_invariants()?;
    let snapshot = editor.workspace().to_snapshot();
    std::fs::write(&cli.output, snapshot.to_json()?)?;
    println!(
        "Successfully generated {} items and saved the snapshot to '{}'",
        snapshot.items.len(),
        cli.output
    );

    if let Some(path) = cli.artifact {
        SnapshotArtifact::from(snapshot).save(&path)?;
        println!("Saved binary artifact to '{}'", path);
    }

    Ok(())
}

/// The templates random behaviours are drawn from.
fn palette() -> MemoryTemplates {
    let output = |name: &str| PortalDefinition::new(name, PortalKind::Output, DataType::Bool);
    let input = |name: &str| PortalDefinition::new(name, PortalKind::Input, DataType::Bool);

    MemoryTemplates::new()
        .with_template(
            "timer",
            BehaviourDefinition::new("Timer")
                .with_portal(input("Start"))
                .with_portal(output("Elapsed"))
                .with_portal(PortalDefinition::new("Seconds", PortalKind::Parameter, DataType::Number))
                .with_portal(PortalDefinition::new("Ticks", PortalKind::Product, DataType::Int)),
        )
        .with_template(
            "log",
            BehaviourDefinition::new("Log")
                .with_portal(input("Execute"))
                .with_portal(PortalDefinition::new("Message", PortalKind::Parameter, DataType::String)),
        )
        .with_template(
            "scale",
            BehaviourDefinition::new("Scale")
                .with_portal(input("Apply"))
                .with_portal(output("Done"))
                .with_portal(PortalDefinition::new("Factor", PortalKind::Parameter, DataType::Number))
                .with_portal(PortalDefinition::new("Target", PortalKind::Parameter, DataType::Object)),
        )
        .with_template(
            "tween",
            BehaviourDefinition::new("Tween")
                .with_portal(input("Play"))
                .with_portal(output("Finished"))
                .with_portal(PortalDefinition::new("Progress", PortalKind::Product, DataType::Number)),
        )
        .with_template(
            "branch",
            BehaviourDefinition::new("Branch")
                .with_portal(input("Test"))
                .with_portal(output("True"))
                .with_portal(output("False"))
                .with_portal(PortalDefinition::new("Condition", PortalKind::Parameter, DataType::Bool)),
        )
}

fn place_container_portals(editor: &mut Editor) -> Result<()> {
    let portals = [
        PortalDefinition::new("Start", PortalKind::Output, DataType::Bool),
        PortalDefinition::new("Finish", PortalKind::Input, DataType::Bool),
    ];
    for (n, portal) in portals.into_iter().enumerate() {
        editor.do_action(Action::CreatePortal {
            portal,
            x: 0,
            y: n as i32 * 100,
        })?;
    }
    Ok(())
}

/// Tries random source/target pairs; incompatible or duplicate pairs are skipped.
fn generate_links(
    editor: &mut Editor,
    rng: &mut StdRng,
    behaviours: &[ItemId],
    attempts_per_behaviour: usize,
) -> usize {
    let mut created = 0;
    for &source in behaviours {
        for _ in 0..attempts_per_behaviour {
            let Some(from) = random_portal(editor, rng, source, true) else {
                continue;
            };
            let target = behaviours[rng.random_range(0..behaviours.len())];
            let Some(to) = random_portal(editor, rng, target, false) else {
                continue;
            };
            match editor.do_action(Action::CreateLink {
                source: from,
                target: to,
            }) {
                Ok(_) => created += 1,
                Err(e) => debug!(error = %e, "skipping link"),
            }
        }
    }
    created
}

fn random_portal(editor: &Editor, rng: &mut StdRng, item: ItemId, source: bool) -> Option<PortalRef> {
    let candidates: Vec<&str> = editor
        .workspace()
        .item(item)?
        .portals()
        .iter()
        .filter(|p| p.kind().is_source() == source)
        .map(Portal::name)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let name = candidates[rng.random_range(0..candidates.len())];
    Some(PortalRef::new(item, name))
}
