//! Toy components the demo applications are assembled from.
//!
//! Each one is a plain [`Object`]; the ones that need setting up expose an
//! `install` method that the orchestrator calls during bootstrap.
use appspec_core::kernel::error::{Error, Result};
use appspec_core::object::{Callable, Factory, Kwargs};
use appspec_core::{Catalog, Instance, Object, Value};
use log::info;

fn no_such_method(object: &dyn Object, name: &str) -> Error {
    Error::NoSuchMethod {
        object: object.type_name().to_string(),
        method: name.to_string(),
    }
}

fn flag(kwargs: &Kwargs, name: &str) -> bool {
    kwargs.get(name).and_then(Value::as_bool).unwrap_or(true)
}

/// Prints a line when installed
#[derive(Debug)]
pub struct Installer {
    name: &'static str,
    message: &'static str,
}

impl Object for Installer {
    fn type_name(&self) -> &str {
        self.name
    }

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn has_method(&self, name: &str) -> bool {
        name == "install"
    }

    fn call_method(&self, name: &str, _cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        match name {
            "install" => {
                println!("{}", self.message);
                Ok(Value::Null)
            }
            other => Err(no_such_method(self, other)),
        }
    }
}

fn installer(name: &'static str, message: &'static str) -> Factory {
    Factory::object(name, move |_| Ok(Installer { name, message }))
}

pub fn sigterm_stop() -> Factory {
    installer("SigTermStop", "installing sigterm stop")
}

pub fn basic_genie() -> Factory {
    installer("BasicGenie", "installing genie")
}

pub fn background_tasks() -> Factory {
    installer("BackGroundTasks", "installing background tasks")
}

#[derive(Debug)]
pub struct Logger;

impl Object for Logger {
    fn type_name(&self) -> &str {
        "Logger"
    }

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }
}

pub fn logger() -> Factory {
    Factory::object("Logger", |_| Ok(Logger))
}

/// Sets the process title on install
#[derive(Debug)]
pub struct Proctitle;

impl Object for Proctitle {
    fn type_name(&self) -> &str {
        "Proctitle"
    }

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn has_method(&self, name: &str) -> bool {
        matches!(name, "install" | "get_title")
    }

    fn call_method(&self, name: &str, _cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        match name {
            "install" => {
                println!("installing proctitle");
                Ok(Value::Null)
            }
            "get_title" => Ok(Value::from("")),
            other => Err(no_such_method(self, other)),
        }
    }
}

pub fn proctitle() -> Factory {
    Factory::object("Proctitle", |_| Ok(Proctitle))
}

#[derive(Debug)]
pub struct Cli;

impl Object for Cli {
    fn type_name(&self) -> &str {
        "Cli"
    }

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn has_method(&self, name: &str) -> bool {
        name == "get_parser"
    }

    fn call_method(&self, name: &str, _cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        match name {
            "get_parser" => Ok(Value::Null),
            other => Err(no_such_method(self, other)),
        }
    }
}

pub fn cli() -> Factory {
    Factory::object("Cli", |_| Ok(Cli))
}

/// Strategy whose runner hands over to the application's `action`
#[derive(Debug)]
pub struct Utility {
    log_finish: bool,
    log_startup: bool,
}

impl Object for Utility {
    fn type_name(&self) -> &str {
        "Utility"
    }

    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "log_finish" => Some(Value::Bool(self.log_finish)),
            "log_startup" => Some(Value::Bool(self.log_startup)),
            _ => None,
        }
    }

    fn has_method(&self, name: &str) -> bool {
        name == "runner"
    }

    fn call_method(&self, name: &str, cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        match name {
            "runner" => {
                if self.log_startup {
                    info!("Starting {}", cx.type_name());
                }
                let result = cx.call("action", Vec::new())?;
                if self.log_finish {
                    info!("Finished {}", cx.type_name());
                }
                Ok(result)
            }
            other => Err(no_such_method(self, other)),
        }
    }
}

pub fn utility() -> Factory {
    Factory::object("Utility", |kwargs| {
        Ok(Utility {
            log_finish: flag(&kwargs, "log_finish"),
            log_startup: flag(&kwargs, "log_startup"),
        })
    })
    .param_with_default("log_finish", true)
    .param_with_default("log_startup", true)
    .requires(["action"])
}

/// Strategy that does nothing
#[derive(Debug)]
pub struct Empty;

impl Object for Empty {
    fn type_name(&self) -> &str {
        "Empty"
    }

    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }

    fn has_method(&self, name: &str) -> bool {
        name == "runner"
    }

    fn call_method(&self, name: &str, _cx: &Instance, _args: Vec<Value>) -> Result<Value> {
        match name {
            "runner" => Ok(Value::Null),
            other => Err(no_such_method(self, other)),
        }
    }
}

pub fn empty() -> Factory {
    Factory::object("Empty", |_| Ok(Empty))
}

/// `action(blah)`: what the better app actually does
pub fn action() -> Callable {
    Callable::new("action", |_cx, args| {
        let blah = args.into_iter().next().unwrap_or(Value::Null);
        println!("joy to the world! : {}", blah);
        Ok(blah)
    })
    .requires(["components.blah"])
    .not_a_checker()
}

/// Every toy under the name spec documents refer to it by
pub fn catalog() -> Catalog {
    Catalog::new()
        .factory(logger())
        .factory(proctitle())
        .factory(sigterm_stop())
        .factory(basic_genie())
        .factory(background_tasks())
        .factory(cli())
        .factory(utility())
        .factory(empty())
        .callable(action())
}
