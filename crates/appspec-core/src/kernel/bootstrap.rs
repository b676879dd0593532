use crate::compiler::BookKeeper;
use crate::kernel::constants::INSTALL_METHOD;
use crate::kernel::error::{Error, ErrorContext, LifecyclePhase, PathDesc, Result};
use crate::kernel::instance::Instance;
use crate::object::{resolve, Value};

/// Drives an [`Instance`] through `Created -> Validated -> Installed -> Running`.
pub struct Orchestrator<'a> {
    instance: &'a Instance,
}

impl<'a> Orchestrator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// `create_things`, `sanity_check`, `install`
    pub fn bootstrap(&self) -> Result<()> {
        log::info!("Bootstrapping {}", self.instance.type_name());
        self.create_things()?;
        self.sanity_check()?;
        self.install()?;
        log::info!("{} bootstrapped successfully.", self.instance.type_name());
        Ok(())
    }

    /// `bootstrap`, then `run`
    pub fn execute(&self) -> Result<Value> {
        self.bootstrap()?;
        self.run()
    }

    /// Build every component group and custom object the layers defer.
    pub fn create_things(&self) -> Result<()> {
        let instance = self.instance;
        if instance.phase() != LifecyclePhase::Created {
            return Err(Error::Lifecycle {
                phase: instance.phase(),
                message: "create_things needs the instance to be Created".to_string(),
            });
        }
        instance.mark_materialized()?;

        log::info!("Creating things...");
        for deferred in instance.compiled().deferred() {
            log::debug!("Creating '{}' from {}", deferred.identity(), deferred.origin());
            let value = deferred.materialize()?;
            instance.place(deferred.identity(), value);
        }
        log::info!("Creating things complete.");
        Ok(())
    }

    /// Check requirements, run checkers and make sure `methods` entries are callable.
    pub fn sanity_check(&self) -> Result<()> {
        let instance = self.instance;
        if !instance.is_materialized() {
            return Err(Error::Lifecycle {
                phase: instance.phase(),
                message: "sanity_check needs create_things to have run".to_string(),
            });
        }
        instance.advance("sanity_check", LifecyclePhase::Created, LifecyclePhase::Validated)?;
        let compiled = instance.compiled();

        log::info!("Checking requirements...");
        for requirement in compiled.requirements() {
            BookKeeper::path_check(instance, requirement)?;
        }

        for checker in compiled.checkers() {
            match instance.get(&checker.identity)? {
                Value::Callable(callable) if callable.is_checker() => {
                    log::debug!("Running checker '{}'", checker.identity);
                    callable.call(instance, Vec::new())?;
                }
                Value::Method(method) => {
                    log::debug!("Running checker '{}'", checker.identity);
                    method.call(instance, Vec::new())?;
                }
                other => log::debug!("Skipping checker '{}' ({})", checker.identity, other.kind()),
            }
        }

        for method in compiled.methods() {
            let value = instance.get(&method.identity)?;
            if !value.is_callable() {
                let provenance = compiled.provenance(&method.identity);
                let mut context = ErrorContext::new().origin(&method.origin);
                if let Some(added_by) = &provenance.added_by {
                    context = context.with("added_by", added_by);
                }
                if let Some(removed_by) = &provenance.removed_by {
                    context = context.with("removed_by", removed_by);
                }
                return Err(Error::UnexpectedValue {
                    identity: method.identity.clone(),
                    value: value.describe(),
                    context,
                });
            }
        }
        log::info!("Sanity check complete.");
        Ok(())
    }

    /// Call `install(instance)` on every installer, most-derived layer first.
    pub fn install(&self) -> Result<()> {
        let instance = self.instance;
        instance.advance("install", LifecyclePhase::Validated, LifecyclePhase::Installed)?;

        log::info!("Installing...");
        for entry in instance.compiled().installers() {
            let target = resolve(instance, &entry.path)
                .map_err(|err| err.into_requirement(PathDesc::Installing, &entry.identity, &entry.origin))?;

            match &target {
                Value::Object(object) if object.has_method(INSTALL_METHOD) => {
                    log::info!("Installing '{}' from {}", entry.identity, entry.path);
                    object.call_method(INSTALL_METHOD, instance, Vec::new())?;
                }
                other => {
                    return Err(Error::RequirementAttribute {
                        desc: PathDesc::Installing,
                        path: entry.path.clone(),
                        obj: other.describe(),
                        requires: INSTALL_METHOD.to_string(),
                        identity: entry.identity.clone(),
                        origin: entry.origin.clone(),
                    });
                }
            }
        }
        log::info!("Install complete.");
        Ok(())
    }

    /// Invoke the runner with the instance and return its value.
    pub fn run(&self) -> Result<Value> {
        let instance = self.instance;
        instance.advance("run", LifecyclePhase::Installed, LifecyclePhase::Running)?;

        log::info!("Running {} via '{}'", instance.type_name(), instance.runner());
        let origin = instance.compiled().own().origin().clone();
        let runner = resolve(instance, instance.runner())
            .map_err(|err| err.into_requirement(PathDesc::Requires, instance.runner(), &origin))?;
        runner.invoke(instance, Vec::new())
    }
}
