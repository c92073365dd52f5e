use anyhow::{bail, Context, Result};
use std::env;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

// Use library instead of local modules
use familybook::{
    import_relationships, init_logging, AppConfig, FamilyNetwork, FamilyService,
    MemberAttributes, RelationshipType, SqliteStore,
};

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = take_config_flag(&mut args)?;
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.log_level);

    if args.is_empty() || args[0] == "help" || args[0] == "--help" {
        print_help();
        return Ok(());
    }

    // The CLI always works against the SQLite file
    let store = SqliteStore::open(&config.database_path).with_context(|| {
        format!("Failed to open database at {:?}", config.database_path)
    })?;
    let service = FamilyService::new(Arc::new(store));

    let command = args[0].as_str();
    let rest = &args[1..];

    match command {
        "create" => run_create(&service, rest),
        "list" => run_list(&service),
        "show" => run_show(&service, rest),
        "add-member" => run_add_member(&service, rest),
        "relate" => run_relate(&service, rest),
        "chain" => run_chain(&service, rest),
        "import" => run_import(&service, rest),
        other => {
            print_help();
            bail!("Unknown command: {}", other)
        }
    }
}

/// Pull `--config <file>` out of the argument list
fn take_config_flag(args: &mut Vec<String>) -> Result<Option<PathBuf>> {
    match args.iter().position(|a| a == "--config") {
        Some(i) => {
            if i + 1 >= args.len() {
                bail!("--config requires a path");
            }
            let path = PathBuf::from(args.remove(i + 1));
            args.remove(i);
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

fn expect_args<'a>(rest: &'a [String], count: usize, usage: &str) -> Result<&'a [String]> {
    if rest.len() < count {
        bail!("Usage: familybook {}", usage);
    }
    Ok(rest)
}

/// Accept a member id or a member name
fn resolve_member(network: &FamilyNetwork, reference: &str) -> Result<String> {
    network
        .find_member(reference)
        .map(|m| m.id.clone())
        .with_context(|| format!("No member '{}' in {}", reference, network.name))
}

fn run_create(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 2, "create <family-name> <creator-name> [description]")?;
    let network = service.create_network(&args[0], &args[1], args.get(2).cloned())?;

    println!("🌳 Created family network \"{}\"", network.name);
    println!("   id:      {}", network.id);
    println!("   creator: {} ({})", network.created_by, network.members()[0].id);
    Ok(())
}

fn run_list(service: &FamilyService) -> Result<()> {
    let networks = service.list_networks()?;
    if networks.is_empty() {
        println!("No family networks yet. Run: familybook create <name> <creator>");
        return Ok(());
    }

    for network in networks {
        println!(
            "{}  {:<30} {} member(s)",
            network.id, network.name, network.member_count
        );
    }
    Ok(())
}

fn run_show(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 1, "show <network-id>")?;
    let network = service.get_network(&args[0])?;

    println!("👨‍👩‍👧 {} ({} members)", network.name, network.member_count());
    if let Some(description) = &network.description {
        println!("   {}", description);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for member in network.members() {
        println!("{}  {}", member.id, member.name());
        for edge in network.graph.neighbors(&member.id) {
            let other = network
                .graph
                .member(&edge.member_id)
                .map(|m| m.name())
                .unwrap_or("?");
            println!("      {} of {}", edge.relationship, other);
        }
    }
    Ok(())
}

fn run_add_member(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 2, "add-member <network-id> <name>")?;
    let member = service.add_member(&args[0], MemberAttributes::named(args[1].as_str()))?;

    println!("✓ Added {} ({})", member.name(), member.id);
    Ok(())
}

fn run_relate(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 4, "relate <network-id> <from-member> <to-member> <type>")?;
    let network = service.get_network(&args[0])?;
    let from = resolve_member(&network, &args[1])?;
    let to = resolve_member(&network, &args[2])?;
    let kind = RelationshipType::parse(&args[3]);
    let reciprocal = kind.reciprocal();

    service.add_relationship(&network.id, &from, &to, kind.clone())?;

    println!("✓ {} is {} of {}", args[1], kind, args[2]);
    println!("✓ {} is {} of {}", args[2], reciprocal, args[1]);
    Ok(())
}

fn run_chain(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 3, "chain <network-id> <from-member> <to-member>")?;
    let network = service.get_network(&args[0])?;
    let from = resolve_member(&network, &args[1])?;
    let to = resolve_member(&network, &args[2])?;

    let chain = service.find_relationship_chain(&network.id, &from, &to)?;

    if chain.is_empty() {
        println!("🔗 No relationship found");
        println!("   These family members are not connected in the current family tree.");
        return Ok(());
    }

    let rendered: Vec<String> = chain
        .chain
        .iter()
        .map(|link| match &link.relationship_to_next {
            Some(rel) => format!("{} → {} →", link.member_name, rel),
            None => link.member_name.clone(),
        })
        .collect();

    println!("🔗 {}", rendered.join(" "));
    println!("   Relationship Summary: {}", chain.summary);
    Ok(())
}

fn run_import(service: &FamilyService, rest: &[String]) -> Result<()> {
    let args = expect_args(rest, 2, "import <network-id> <relationships.csv>")?;
    let file = File::open(&args[1]).with_context(|| format!("Failed to open {}", args[1]))?;

    println!("📂 Importing relationships from {}...", args[1]);
    let summary = import_relationships(service, &args[0], file)?;

    println!("✓ Rows imported:          {}", summary.rows);
    println!("✓ Members created:        {}", summary.members_created);
    println!("✓ Relationships added:    {}", summary.relationships_added);
    Ok(())
}

fn print_help() {
    println!("FamilyBook - Family networks and relationship chains");
    println!();
    println!("USAGE:");
    println!("    familybook [--config <file.toml>] <command> [args]");
    println!();
    println!("COMMANDS:");
    println!("    create <family-name> <creator-name> [description]");
    println!("    list");
    println!("    show <network-id>");
    println!("    add-member <network-id> <name>");
    println!("    relate <network-id> <from-member> <to-member> <type>");
    println!("    chain <network-id> <from-member> <to-member>");
    println!("    import <network-id> <relationships.csv>");
    println!();
    println!("Members may be given by id or by name.");
    println!("Relationship types: parent, child, sibling, spouse, grandparent, grandchild,");
    println!("                    uncle, aunt, nephew, niece, cousin (others are kept as-is)");
}
