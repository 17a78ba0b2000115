//! Generation pipeline - plans and executes every scaffolding step

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::core::error::{Error, Result};
use crate::core::{Engine, GenerationOptions};
use crate::generation::{
    AppFlags, ProjectGenerator, StepAction, StepExecutor, StepPlan, StepRunner, Variant,
    variant_matrix,
};
use crate::infrastructure::backends::BackendRegistry;
use crate::infrastructure::output::{ContentPatcher, remove_paths};
use crate::infrastructure::templates::{RenderContext, TemplateMaterializer, TemplateRepository};

/// Generated files every dummy app can do without
pub const UNNEEDED_FILES: [&str; 9] = [
    ".gitignore",
    "doc",
    "lib/tasks",
    "public/images/rails.png",
    "public/index.html",
    "public/robots.txt",
    "README",
    "test",
    "vendor",
];

/// Start of the application definition in a generated `config/application.rb`
pub const APPLICATION_MARKER: &str = "module Dummy";

/// Token in the per-app integration specs replaced by the backend name
pub const ORM_TOKEN: &str = "#orm#";

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub root: PathBuf,
    pub apps: Vec<PathBuf>,
}

/// Drives the whole scaffolding run for one engine
pub struct Pipeline {
    engine: Engine,
    options: GenerationOptions,
    variants: Vec<Variant>,
    materializer: TemplateMaterializer,
    generator: Arc<dyn ProjectGenerator>,
    backends: BackendRegistry,
}

impl Pipeline {
    pub fn new(
        engine: Engine,
        options: GenerationOptions,
        templates: Arc<dyn TemplateRepository>,
        generator: Arc<dyn ProjectGenerator>,
        backends: BackendRegistry,
    ) -> Result<Self> {
        options.validate()?;
        let variants = variant_matrix(&options.postfixes, &options.backends, options.test_path());

        let mut seen = HashSet::new();
        for variant in &variants {
            if !variant.is_confined() {
                return Err(Error::config(format!(
                    "Dummy app path {} escapes the engine root",
                    variant.relative_path.display()
                )));
            }
            if !seen.insert(&variant.relative_path) {
                warn!(
                    path = %variant.relative_path.display(),
                    "Several variants share one dummy app destination"
                );
            }
        }

        debug!(
            engine = %engine.name(),
            templates = %templates.describe(),
            strategies = ?backends.backends(),
            variants = variants.len(),
            "Pipeline configured"
        );

        Ok(Self {
            engine,
            options,
            variants,
            materializer: TemplateMaterializer::new(templates),
            generator,
            backends,
        })
    }

    /// Every step of the run, declared up front in execution order
    pub fn plan(&self) -> StepPlan {
        let mut plan = StepPlan::new();
        plan.declare("Creating gem skeleton", StepAction::CreateSkeleton);
        plan.declare(
            format!(
                "Vendoring Rails applications at {}/dummy-apps",
                self.options.test_path()
            ),
            StepAction::VendorApps,
        );

        for variant in &self.variants {
            let name = variant.display_name();
            plan.declare(
                format!("Creating dummy Rails app with {name}"),
                StepAction::GenerateApp(variant.clone()),
            );
            plan.declare(
                "Configuring Rails app",
                StepAction::ConfigureApp(variant.clone()),
            );
            plan.declare(
                "Removing unneeded files",
                StepAction::RemoveUnneededFiles(variant.clone()),
            );
            if self.backends.has_strategy(&variant.backend) {
                plan.declare(
                    format!("Configuring app for {}", variant.backend),
                    StepAction::ConfigureBackend(variant.clone()),
                );
            }
            plan.declare(
                format!("Configuring testing framework for {name}"),
                StepAction::ConfigureTestFramework(variant.clone()),
            );
        }
        plan
    }

    /// Run every step, writing status lines to `out`
    pub async fn run<W: Write>(&self, out: W) -> Result<GenerationReport> {
        let plan = self.plan();
        info!(
            root = %self.engine.root().display(),
            steps = plan.len(),
            "Generating engine {}",
            self.engine.camelized()
        );

        let mut runner = StepRunner::new(out, self.engine.root());
        runner.run(&plan, self).await?;

        let apps: Vec<PathBuf> = self
            .variants
            .iter()
            .map(|v| v.app_path(self.engine.root()))
            .collect();
        for app in &apps {
            info!(app = %app.display(), "Dummy app ready");
        }

        Ok(GenerationReport {
            root: self.engine.root().to_path_buf(),
            apps,
        })
    }

    fn base_context(&self) -> RenderContext {
        RenderContext::new()
            .with("name", json!(self.engine.name()))
            .with("camelized", json!(self.engine.camelized()))
            .with("underscored", json!(self.engine.underscored()))
            .with("test_path", json!(self.options.test_path()))
            .with("test_framework", json!(self.options.test_framework.as_str()))
            .with("backends", json!(self.options.backends))
            .with("postfixes", json!(self.options.postfixes))
    }

    fn variant_context(&self, variant: &Variant) -> RenderContext {
        self.base_context()
            .with("backend", json!(variant.backend))
            .with("postfix", json!(variant.postfix))
            .with("active_record", json!(variant.is_active_record()))
            .with("dummy_path", json!(variant.relative_path.to_string_lossy()))
    }

    async fn create_skeleton(&self) -> Result<()> {
        let root = self.engine.root();
        fs::create_dir_all(root)
            .await
            .map_err(|e| Error::write(root, e))?;

        let context = self.base_context();
        let test_path = self.options.test_path();
        self.materializer
            .materialize("root", root, false, &context)
            .await?;
        self.materializer
            .materialize(test_path, &root.join(test_path), false, &context)
            .await?;
        self.materializer
            .materialize("gitignore", &root.join(".gitignore"), false, &context)
            .await?;
        Ok(())
    }

    async fn vendor_apps(&self) -> Result<()> {
        let dir = self.engine.root().join(self.options.test_path()).join("dummy-apps");
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::write(&dir, e))
    }

    async fn generate_app(&self, variant: &Variant) -> Result<()> {
        let flags = AppFlags::for_variant(&self.options, variant);
        self.generator
            .generate(&variant.app_path(self.engine.root()), &flags)
            .await
    }

    /// Capture the application definition, then force the config templates over it
    async fn configure_app(&self, variant: &Variant) -> Result<()> {
        let app = variant.app_path(self.engine.root());
        let config = app.join("config");
        let definition = capture_application_definition(&config.join("application.rb")).await?;

        let context = self
            .variant_context(variant)
            .with("application_definition", json!(definition));
        self.materializer
            .materialize("rails/boot.rb", &config.join("boot.rb"), true, &context)
            .await?;
        self.materializer
            .materialize(
                "rails/application.rb",
                &config.join("application.rb"),
                true,
                &context,
            )
            .await?;
        Ok(())
    }

    async fn remove_unneeded_files(&self, variant: &Variant) -> Result<()> {
        let app = variant.app_path(self.engine.root());
        let removed = remove_paths(&app, &UNNEEDED_FILES).await?;
        debug!(app = %app.display(), removed = removed.len(), "Removed unneeded files");
        Ok(())
    }

    async fn configure_backend(&self, variant: &Variant) -> Result<()> {
        match self.backends.get(&variant.backend) {
            Some(strategy) => {
                strategy
                    .configure(&variant.app_path(self.engine.root()))
                    .await
            }
            None => Ok(()),
        }
    }

    async fn configure_test_framework(&self, variant: &Variant) -> Result<()> {
        if !self.options.test_framework.is_rspec() {
            warn!(
                backend = %variant.backend,
                test_framework = %self.options.test_framework,
                "Not implemented for test unit"
            );
            return Ok(());
        }

        let spec_dir = variant
            .app_path(self.engine.root())
            .join(self.options.test_path());
        self.materializer
            .materialize("dummy_spec", &spec_dir, true, &self.variant_context(variant))
            .await?;

        let integration = spec_dir.join("integration");
        for file in [
            integration.join("navigation_spec.rb"),
            integration.join(format!("{}_spec.rb", self.engine.underscored())),
        ] {
            ContentPatcher::replace_all(&file, ORM_TOKEN, &variant.backend).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StepExecutor for Pipeline {
    async fn execute(&self, action: &StepAction) -> Result<()> {
        match action {
            StepAction::CreateSkeleton => self.create_skeleton().await,
            StepAction::VendorApps => self.vendor_apps().await,
            StepAction::GenerateApp(variant) => self.generate_app(variant).await,
            StepAction::ConfigureApp(variant) => self.configure_app(variant).await,
            StepAction::RemoveUnneededFiles(variant) => self.remove_unneeded_files(variant).await,
            StepAction::ConfigureBackend(variant) => self.configure_backend(variant).await,
            StepAction::ConfigureTestFramework(variant) => {
                self.configure_test_framework(variant).await
            }
        }
    }
}

/// Everything from the first `module Dummy` to the end of `content`
pub fn application_definition(content: &str) -> Option<&str> {
    content
        .find(APPLICATION_MARKER)
        .map(|index| &content[index..])
}

/// Read the application definition a generator wrote to `path`
pub async fn capture_application_definition(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).await?;
    application_definition(&content)
        .map(str::to_string)
        .ok_or_else(|| Error::AnchorNotFound {
            path: path.to_path_buf(),
            anchor: APPLICATION_MARKER.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TestFramework;
    use crate::infrastructure::shell::MockCommandExecutor;
    use crate::infrastructure::templates::EmbeddedTemplateRepository;
    use tracing_test::traced_test;

    struct NoopGenerator;

    #[async_trait]
    impl ProjectGenerator for NoopGenerator {
        async fn generate(&self, _destination: &Path, _flags: &AppFlags) -> Result<()> {
            Ok(())
        }
    }

    fn pipeline(options: GenerationOptions) -> Pipeline {
        let engine = Engine::new("/tmp/blog_engine", Path::new("/")).unwrap();
        let backends =
            BackendRegistry::with_defaults("rails", Arc::new(MockCommandExecutor::new()));
        Pipeline::new(
            engine,
            options,
            Arc::new(EmbeddedTemplateRepository::new()),
            Arc::new(NoopGenerator),
            backends,
        )
        .unwrap()
    }

    #[test]
    fn test_application_definition_starts_at_marker() {
        let content = "require 'rails/all'\n\nmodule DummyMongoid\n  class Application\n  end\nend\n";
        let definition = application_definition(content).unwrap();
        assert!(definition.starts_with("module DummyMongoid"));
        assert!(definition.ends_with("end\n"));
        assert!(application_definition("class Foo; end").is_none());
    }

    #[test]
    fn test_plan_for_default_options() {
        let labels: Vec<String> = pipeline(GenerationOptions::default())
            .plan()
            .steps()
            .iter()
            .map(|s| format!("{}: {}", s.ordinal, s.label))
            .collect();

        assert_eq!(
            labels,
            vec![
                "1: Creating gem skeleton",
                "2: Vendoring Rails applications at test/dummy-apps",
                "3: Creating dummy Rails app with active_record",
                "4: Configuring Rails app",
                "5: Removing unneeded files",
                "6: Configuring testing framework for active_record",
            ]
        );
    }

    #[test]
    fn test_plan_adds_backend_step_only_with_strategy() {
        let options = GenerationOptions {
            test_framework: TestFramework::Rspec,
            backends: vec!["active_record".to_string(), "mongoid".to_string()],
            ..Default::default()
        };
        let plan = pipeline(options).plan();

        let backend_steps: Vec<&StepAction> = plan
            .steps()
            .iter()
            .map(|s| &s.action)
            .filter(|a| matches!(a, StepAction::ConfigureBackend(_)))
            .collect();
        assert_eq!(backend_steps.len(), 1);
        assert!(matches!(backend_steps[0], StepAction::ConfigureBackend(v) if v.backend == "mongoid"));
        assert_eq!(plan.len(), 2 + 4 + 5);
    }

    #[traced_test]
    #[test]
    fn test_shared_destination_is_reported() {
        let options = GenerationOptions {
            backends: vec!["active_record".to_string(), "active_record".to_string()],
            ..Default::default()
        };
        let plan = pipeline(options).plan();

        assert_eq!(plan.len(), 2 + 4 + 4);
        assert!(logs_contain("Several variants share one dummy app destination"));
    }

    #[traced_test]
    #[test]
    fn test_distinct_destinations_are_quiet() {
        pipeline(GenerationOptions {
            backends: vec!["active_record".to_string(), "mongoid".to_string()],
            ..Default::default()
        });
        assert!(!logs_contain("share one dummy app destination"));
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        let engine = Engine::new("/tmp/blog_engine", Path::new("/")).unwrap();
        let result = Pipeline::new(
            engine,
            GenerationOptions {
                backends: vec![],
                ..Default::default()
            },
            Arc::new(EmbeddedTemplateRepository::new()),
            Arc::new(NoopGenerator),
            BackendRegistry::new(),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
