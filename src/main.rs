// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tiller CLI entrypoint.
//!
//! Reads and writes settings through the simulated settings application, backed by a JSON
//! defaults file when `--defaults` is given and by memory otherwise.

use std::error::Error;
use std::sync::Arc;

use tiller::automation::register_builtin_write_adapters;
use tiller::config::AutomationConfig;
use tiller::model::{HandlerDescriptor, PreferenceKey, Preferences, Setting};
use tiller::nav::SettingsApp;
use tiller::settings::{
    builtin_registry, json_schema, SettingsContext, SettingsManager, SettingsRegistry,
};
use tiller::sim::{SimulatedSettingsApp, SimulatorOptions};
use tiller::store::{DefaultsStore, JsonFileDefaults, MemoryDefaults, WriteDurability};
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [options] list\n  {program} [options] info <solution> <preference>\n  {program} [options] read <solution> <preference>\n  {program} [options] write <solution> <preference> <value>\n  {program} [options] capture\n  {program} [options] schema\n\nOptions:\n  --registry <file>   extend the built-in schema document with <file>\n  --defaults <file>   persist settings in a JSON defaults file (in memory if omitted)\n  --config <file>     automation timing configuration (JSON)\n  --durable-writes    fsync the defaults file on every flush\n\nLogging is controlled by RUST_LOG (default: warn)."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Info { solution: String, preference: String },
    Read { solution: String, preference: String },
    Write {
        solution: String,
        preference: String,
        value: String,
    },
    Capture,
    Schema,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    registry: Option<String>,
    defaults: Option<String>,
    config: Option<String>,
    durable_writes: bool,
    command: Command,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut registry = None;
    let mut defaults = None;
    let mut config = None;
    let mut durable_writes = false;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "--registry" => &mut registry,
            "--defaults" => &mut defaults,
            "--config" => &mut config,
            "--durable-writes" => {
                if durable_writes {
                    return Err(());
                }
                durable_writes = true;
                continue;
            }
            // Single-dash arguments are values (`write ... -1`).
            _ if arg.starts_with("--") => return Err(()),
            _ => {
                positional.push(arg);
                continue;
            }
        };
        if slot.is_some() {
            return Err(());
        }
        *slot = Some(args.next().ok_or(())?);
    }

    let mut positional = positional.into_iter();
    let command = match positional.next().as_deref() {
        Some("list") => Command::List,
        Some("capture") => Command::Capture,
        Some("schema") => Command::Schema,
        Some("info") => Command::Info {
            solution: positional.next().ok_or(())?,
            preference: positional.next().ok_or(())?,
        },
        Some("read") => Command::Read {
            solution: positional.next().ok_or(())?,
            preference: positional.next().ok_or(())?,
        },
        Some("write") => Command::Write {
            solution: positional.next().ok_or(())?,
            preference: positional.next().ok_or(())?,
            value: positional.next().ok_or(())?,
        },
        _ => return Err(()),
    };
    if positional.next().is_some() {
        return Err(());
    }
    if durable_writes && defaults.is_none() {
        return Err(());
    }

    Ok(CliOptions {
        registry,
        defaults,
        config,
        durable_writes,
        command,
    })
}

fn load_registry(options: &CliOptions) -> Result<SettingsRegistry, Box<dyn Error>> {
    let mut registry = builtin_registry()?;
    if let Some(path) = &options.registry {
        registry.extend_from_path(path)?;
    }
    Ok(registry)
}

fn open_store(options: &CliOptions) -> Result<Arc<dyn DefaultsStore>, Box<dyn Error>> {
    Ok(match &options.defaults {
        Some(path) => {
            let durability = if options.durable_writes {
                WriteDurability::Durable
            } else {
                WriteDurability::BestEffort
            };
            Arc::new(JsonFileDefaults::open(path)?.with_durability(durability))
        }
        None => Arc::new(MemoryDefaults::new()),
    })
}

fn build_manager(
    options: &CliOptions,
    registry: SettingsRegistry,
) -> Result<SettingsManager, Box<dyn Error>> {
    let config = match &options.config {
        Some(path) => AutomationConfig::load_path(path)?,
        None => AutomationConfig::default(),
    };
    let store = open_store(options)?;
    let sim = SimulatedSettingsApp::new(Arc::clone(&store), SimulatorOptions::default())?;
    let app = SettingsApp::new(Arc::new(sim), config);
    let builder = SettingsContext::builder(registry, store);
    let context = register_builtin_write_adapters(builder, &app)?.build();
    Ok(SettingsManager::new(context))
}

fn describe(key: &PreferenceKey, setting: &Setting) -> String {
    let mut out = format!("{key}\n  type: {}\n", setting.value_type());
    if let Some(default) = setting.default_value() {
        out.push_str(&format!("  default: {default}\n"));
    }
    match setting.handler() {
        HandlerDescriptor::Client { key } => out.push_str(&format!("  handler: client ({key})\n")),
        HandlerDescriptor::ReadLocalWriteRemote {
            domain,
            key,
            transform,
            adapter_key,
        } => {
            out.push_str(&format!("  handler: read {domain}/{key}, write via {adapter_key}\n"));
            if let Some(transform) = transform {
                out.push_str(&format!("  transform: {transform:?}\n"));
            }
        }
    }
    if let Some(finalizer) = setting.finalizer() {
        out.push_str(&format!("  finalizer: {}\n", finalizer.unique_representation()));
    }
    out
}

fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let registry = load_registry(&options)?;

    match &options.command {
        Command::Schema => {
            println!("{}", json_schema()?);
            return Ok(());
        }
        Command::List => {
            for key in registry.keys() {
                if let Some(setting) = registry.setting(&key) {
                    println!("{key}\t{}", setting.value_type());
                }
            }
            return Ok(());
        }
        Command::Info {
            solution,
            preference,
        } => {
            let key = PreferenceKey::parse(solution, preference)?;
            let setting = registry
                .setting(&key)
                .ok_or_else(|| format!("unknown setting {key}"))?;
            print!("{}", describe(&key, setting));
            return Ok(());
        }
        Command::Read { .. } | Command::Write { .. } | Command::Capture => {}
    }

    let keys = registry.keys();
    let manager = build_manager(&options, registry)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match options.command {
        Command::Read {
            solution,
            preference,
        } => {
            let key = PreferenceKey::parse(&solution, &preference)?;
            let value = runtime
                .block_on(manager.capture(key.clone()))
                .ok_or_else(|| format!("could not read {key}"))?;
            println!("{}", serde_json::to_string(&value)?);
        }
        Command::Write {
            solution,
            preference,
            value,
        } => {
            let key = PreferenceKey::parse(&solution, &preference)?;
            let setting = manager
                .setting(&key)
                .ok_or_else(|| format!("unknown setting {key}"))?;
            let value = setting.value_type().parse(&value)?;
            if !runtime.block_on(manager.apply(key.clone(), value)) {
                return Err(format!("could not write {key}").into());
            }
        }
        Command::Capture => {
            let mut preferences = Preferences::new();
            for (key, value) in runtime.block_on(manager.capture_all(keys)) {
                preferences.set(&key, value);
            }
            println!("{}", serde_json::to_string_pretty(&preferences)?);
        }
        Command::List | Command::Info { .. } | Command::Schema => {}
    }
    Ok(())
}

fn main() {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "tiller".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(options) {
        eprintln!("tiller: {err}");
        std::process::exit(1);
    }
}
