//! The demo applications, declared with the builder API.
//!
//! `App` wires up every toy component behind an `Empty` strategy,
//! `DifferentApp` swaps in `Utility` and stops installing the genie, and
//! `BetterApp` finally supplies the `action` that `Utility` needs.
use appspec_core::kernel::error::{Error, Result};
use appspec_core::{Callable, Compiler, SpecBlock, TypeRegistry, TypeSpec, Value};

use crate::components::{
    action, background_tasks, basic_genie, cli, empty, logger, proctitle, sigterm_stop, utility,
};

fn check_one() -> Callable {
    Callable::new("check_one", |cx, _args| match cx.get("one")? {
        Value::Int(1) => Ok(Value::Null),
        other => Err(Error::developer(format!("Expected one to be 1, got {}", other))),
    })
}

pub fn app() -> TypeSpec {
    TypeSpec::new("App")
        .block(SpecBlock::new("Genie").main_type(basic_genie()))
        .block(SpecBlock::new("Strategy").main_type(empty()))
        .block(SpecBlock::new("Attrs").entry("one", 1))
        .block(SpecBlock::new("Checkers").entry("check_one", check_one()))
        .block(
            SpecBlock::new("Components")
                .entry("cli", cli())
                .entry("logging", logger())
                .entry("proctitle", proctitle())
                .entry("sigtermstop", sigterm_stop())
                .entry("backgroundtasks", background_tasks()),
        )
        .block(
            SpecBlock::new("Methods")
                .entry("runner", "strategy.runner")
                .entry("get_title", "components.proctitle.get_title")
                .entry("get_parser", "components.cli.get_parser"),
        )
        .block(
            SpecBlock::new("Install")
                .entry("genie", "genie")
                .entry("sigterm", "components.sigtermstop")
                .entry("proctitle", "components.proctitle"),
        )
}

pub fn different_app() -> TypeSpec {
    TypeSpec::new("DifferentApp")
        .block(SpecBlock::new("Strategy").main_type(utility()))
        .block(SpecBlock::new("Components").entry("blah", 3))
        .block(SpecBlock::new("Install").null("genie"))
}

pub fn better_app() -> TypeSpec {
    TypeSpec::new("BetterApp").method(action())
}

/// Compile the three demo types into `registry`
pub fn register(compiler: &Compiler, registry: &mut TypeRegistry) -> Result<()> {
    let app = compiler.compile(app(), &[])?;
    registry.register(app.clone())?;
    let different = compiler.compile(different_app(), &[app])?;
    registry.register(different.clone())?;
    registry.register(compiler.compile(better_app(), &[different])?)?;
    Ok(())
}
