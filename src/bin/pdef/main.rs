//! pdef - Tool for inspecting particle definition dumps.

use std::env;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use particle_def::kv::{KvObject, KvValue};
use particle_def::parser::{CollectingSink, DefinitionParser, DiagnosticSink, KvEnum, TYPE_KEY};
use particle_def::provider::{NumberProviderType, Particle, SystemRenderState, VectorProviderType};
use particle_def::settings::{self, Settings};
use particle_def::anim::DecoderDescriptor;

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut settings = Settings::load();

    // Parse global flags
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => settings.log_filter = "debug".to_string(),
            "-vv" | "--trace" => settings.log_filter = "trace".to_string(),
            "-q" | "--quiet" => settings.log_filter = "off".to_string(),
            _ => filtered_args.push(arg),
        }
    }
    settings::init_tracing(&settings);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        // Providers command - build every provider in a dump
        "providers" | "p" => match filtered_args.get(1) {
            Some(path) => cmd_providers(path),
            None => usage("pdef providers <file.json>"),
        },

        // Eval command - evaluate one root-level provider
        "eval" | "e" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(path), Some(key)) => cmd_eval(path, key, &settings),
            _ => usage("pdef eval <file.json> <key>"),
        },

        // Decoder command - resolve codec names
        "decoder" | "d" => {
            if filtered_args.len() < 2 {
                usage("pdef decoder <name>...")
            } else {
                cmd_decoder(&filtered_args[1..]);
                Ok(())
            }
        }

        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }

        "version" | "--version" => {
            println!("pdef {} (built {})", env!("CARGO_PKG_VERSION"), env!("PDEF_BUILD_DATE"));
            Ok(())
        }

        other => {
            eprintln!("Unknown command: {other}");
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn usage(line: &str) -> Result<()> {
    bail!("missing argument\nUsage: {line}")
}

fn print_help() {
    println!("pdef - particle definition inspector");
    println!();
    println!("USAGE:");
    println!("    pdef [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    p, providers <file.json>        Build every provider found in a definition dump");
    println!("    e, eval <file.json> <key>       Evaluate one root-level provider");
    println!("    d, decoder <name>...            Resolve animation codec names");
    println!("    h, help                         Show this help");
    println!("    version                         Show version");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress all log output");
    println!();
    println!("NOTES:");
    println!("    - PDEF_LOG overrides the log filter (e.g. PDEF_LOG=particle_def=debug)");
    println!("    - eval uses random_seed, detail_level and particle_count from the settings file");
}

fn load(path: &str) -> Result<KvObject> {
    KvObject::from_json_file(path).with_context(|| format!("failed to load {path}"))
}

/// Provider family named by a sub-tree's discriminator, if any.
fn provider_family(value: &KvValue) -> Option<(&'static str, &str)> {
    let type_name = value.as_object()?.get(TYPE_KEY)?.as_str()?;
    if type_name.starts_with(NumberProviderType::PREFIX) {
        Some(("number", type_name))
    } else if type_name.starts_with(VectorProviderType::PREFIX) {
        Some(("vector", type_name))
    } else {
        None
    }
}

#[derive(Default)]
struct ProviderCounts {
    built: usize,
    failed: usize,
}

fn cmd_providers(path: &str) -> Result<()> {
    let tree = load(path)?;
    let sink = CollectingSink::new();
    let mut counts = ProviderCounts::default();

    walk(&DefinitionParser::with_sink(&tree, &sink), "", &mut counts);

    println!();
    println!("Built:   {}", counts.built);
    println!("Failed:  {}", counts.failed);
    let diagnostics = sink.take();
    if !diagnostics.is_empty() {
        println!("Fallbacks:");
        for d in diagnostics {
            println!("  {d}");
        }
    }
    Ok(())
}

fn walk(parse: &DefinitionParser<'_>, prefix: &str, counts: &mut ProviderCounts) {
    for (key, value) in parse.data().iter() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some((family, type_name)) = provider_family(value) {
            let built = match family {
                "number" => parse.number_provider(key).map(|p| format!("{p:?}")),
                _ => parse.vector_provider(key).map(|p| format!("{p:?}")),
            };
            match built {
                Ok(desc) => {
                    counts.built += 1;
                    println!("{path} [{type_name}]: {desc}");
                }
                Err(e) => {
                    counts.failed += 1;
                    println!("{path} [{type_name}]: ERROR {e}");
                }
            }
            continue;
        }

        match value {
            KvValue::Object(_) => {
                if let Ok(child) = parse.object(key) {
                    walk(&child, &path, counts);
                }
            }
            KvValue::Array(items) => {
                if items.iter().all(|item| item.as_object().is_some()) {
                    if let Ok(children) = parse.array(key) {
                        for (i, child) in children.iter().enumerate() {
                            walk(child, &format!("{path}[{i}]"), counts);
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn cmd_eval(path: &str, key: &str, settings: &Settings) -> Result<()> {
    let tree = load(path)?;
    let sink = CollectingSink::new();
    let parse = DefinitionParser::with_sink(&tree, &sink);
    let value = parse.value(key)?;

    let mut rng = StdRng::seed_from_u64(settings.random_seed);
    let particle = Particle::new();
    let state = SystemRenderState::new()
        .with_detail_level(settings.detail_level)
        .with_particle_count(settings.particle_count);

    let is_vector = match provider_family(value) {
        Some((family, _)) => family == "vector",
        None => value.element_count() >= 3,
    };

    if is_vector {
        let provider = parse.vector_provider(key)?;
        println!("{key}: {provider:?}");
        println!("= {}", provider.next_vector(&mut rng, &particle, &state));
    } else {
        let provider = parse.number_provider(key)?;
        println!("{key}: {provider:?}");
        println!("= {}", provider.next_number(&mut rng, &particle, &state));
    }

    for d in sink.take() {
        eprintln!("note: {d}");
    }
    Ok(())
}

fn cmd_decoder(names: &[&str]) {
    let sink = CollectingSink::new();
    for name in names {
        let d = DecoderDescriptor::resolve_reported(name, &sink as &dyn DiagnosticSink);
        println!("{name}: {} ({} bytes)", d.kind, d.element_byte_size);
    }
    if !sink.is_empty() {
        println!("{} name(s) ignored", sink.len());
    }
}
