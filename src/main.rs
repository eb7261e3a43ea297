use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use anystate::adapter::{
    AccessorAdapter, BindingShape, Framework, FrameworkAdapter, RefAdapter, ValueAdapter,
};
use anystate::logging::init_tracing;
use anystate::plugin::builtin::{self, History};
use anystate::reactive::{DependencyValues, META_FRAMEWORK};
use anystate::{ComponentSystem, EngineConfig, Plugin, ReactiveConfig};

/// Drive a counter through the adapter that fits a source file's framework.
#[derive(Debug, Parser)]
#[command(name = "anystate-demo", version)]
struct Cli {
    /// Engine configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source filename used to pick the framework binding shape.
    #[arg(long, default_value = "Counter.tsx")]
    file: PathBuf,

    /// Values to set, in order. Each is doubled before it is committed.
    #[arg(default_values_t = [1, 5])]
    values: Vec<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let framework = Framework::from_path(&cli.file).unwrap_or(Framework::React);
    let system: ComponentSystem<i64> = ComponentSystem::with_config(config)
        .with_plugins(vec![Arc::new(builtin::logger("logger"))]);

    let history = History::new(64);
    let counter = system
        .create(
            ReactiveConfig::new(0_i64)
                .with_name("useCounter")
                .with_meta(META_FRAMEWORK, framework.as_str())
                .with_plugin(
                    Plugin::builder("double")
                        .before_update(|_, v: i64| Ok(v * 2))
                        .build(),
                )
                .with_plugin(history.plugin("history")),
        )
        .await?;

    let source = counter.id().to_string();
    let plus_one = system
        .create(
            ReactiveConfig::computed(1, [source.clone()], move |deps: &DependencyValues<i64>| {
                deps.get(&source).copied().unwrap_or_default() + 1
            })
            .with_name("useCounterPlusOneHook"),
        )
        .await?;

    println!(
        "{} ({:?}): '{}' and '{}'",
        framework,
        framework.binding_shape(),
        counter.id(),
        plus_one.id()
    );

    match framework.binding_shape() {
        BindingShape::ValuePair => {
            let mut adapter = ValueAdapter::new(&system, &counter);
            let mut binding = adapter.bind()?;
            for value in &cli.values {
                binding.setter.set(*value).await?;
                adapter.refresh(&mut binding);
                println!(
                    "set {} -> value {} (plus one: {})",
                    value,
                    binding.value,
                    plus_one.get()?
                );
            }
            adapter.cleanup();
        }
        BindingShape::Accessor => {
            let mut adapter = AccessorAdapter::new(&system, &counter);
            let mut binding = adapter.bind()?;
            for value in &cli.values {
                binding.setter.set(*value).await?;
                adapter.refresh(&mut binding);
                println!(
                    "set {} -> accessor() {} (plus one: {})",
                    value,
                    binding.accessor.get(),
                    plus_one.get()?
                );
            }
            adapter.cleanup();
        }
        BindingShape::Ref => {
            let mut adapter = RefAdapter::new(&system, &counter);
            let binding = adapter.bind()?;
            for value in &cli.values {
                binding.set_value(*value).await?;
                println!(
                    "set {} -> ref.value {} (plus one: {})",
                    value,
                    binding.value(),
                    plus_one.get()?
                );
            }
            adapter.cleanup();
        }
    }

    println!("history: {:?}", history.entries());

    let report = system.shutdown().await;
    for failure in &report.failures {
        eprintln!("teardown: {}", failure);
    }
    println!("destroyed: {}", report.destroyed.join(", "));
    Ok(())
}
