mod components;
mod demo;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use appspec_core::compiler::{CompiledType, Member};
use appspec_core::kernel::error::Result;
use appspec_core::{Compiler, Instance, SpecLoader, TypeRegistry};
use clap::{Args, Parser, Subcommand};
use log::info;

/// Appspec: declarative application assembly
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Log compilation and bootstrap detail
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bootstrap an application type and run it
    Run(Target),
    /// Show how an application type was assembled
    Describe(Target),
    /// List the available application types
    List {
        /// Spec document to load instead of the built-in demo
        #[arg(long)]
        spec: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct Target {
    /// Application type to use
    #[arg(long = "type", default_value = "BetterApp")]
    type_name: String,

    /// Spec document to load instead of the built-in demo
    #[arg(long)]
    spec: Option<PathBuf>,
}

fn registry(spec: Option<&PathBuf>) -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    match spec {
        Some(path) => {
            SpecLoader::new(components::catalog()).load_file(path, &mut registry)?;
        }
        None => demo::register(&Compiler::new(), &mut registry)?,
    }
    Ok(registry)
}

fn run(target: &Target) -> Result<()> {
    let compiled = registry(target.spec.as_ref())?.get(&target.type_name)?;
    let app = Instance::new(compiled);
    let result = app.execute()?;
    info!("{} finished with {}", target.type_name, result.describe());
    Ok(())
}

fn describe(compiled: &Arc<CompiledType>) {
    let names: Vec<&str> = compiled.layers().iter().map(|layer| layer.name()).collect();
    println!("{}", compiled.name());
    println!("  layers: {}", names.join(" -> "));

    println!("  members:");
    for name in compiled.member_names() {
        let Some((layer, member)) = compiled.member(name) else {
            continue;
        };
        let kind = match &member.member {
            Member::Value(value) => value.kind().to_string(),
            Member::Delegate(delegate) => format!("delegate to {}", delegate.path),
            Member::Deferred => "built on bootstrap".to_string(),
        };
        println!("    {} ({}) from {}", name, kind, layer.name());
        let provenance = compiled.provenance(name);
        if let Some(removed_by) = provenance.removed_by {
            println!("      removed by {}", removed_by.label());
        }
    }

    println!("  installers:");
    for entry in compiled.installers() {
        println!("    {} = {} ({})", entry.identity, entry.path, entry.origin.label());
    }

    println!("  requirements:");
    for requirement in compiled.requirements() {
        println!(
            "    {}: {} ({})",
            requirement.identity,
            requirement.paths.join(", "),
            requirement.origin.label()
        );
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    let outcome = match &args.command {
        Some(Commands::Run(target)) => run(target),
        Some(Commands::Describe(target)) => registry(target.spec.as_ref())
            .and_then(|registry| registry.get(&target.type_name))
            .map(|compiled| describe(&compiled)),
        Some(Commands::List { spec }) => registry(spec.as_ref()).map(|registry| {
            for name in registry.names() {
                println!("{}", name);
            }
        }),
        None => run(&Target {
            type_name: "BetterApp".to_string(),
            spec: None,
        }),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
