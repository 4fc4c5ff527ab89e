#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rollout_core::config::Settings;
use rollout_core::context::{AppContext, ApplicationInformation};
use rollout_core::error::DeployError;
use rollout_core::packaging::PackageBuilder;
use rollout_core::scripts::ScriptRunner;
use rollout_core::version::SemanticVersion;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCall {
    pub script: String,
    pub working_dir: PathBuf,
    pub parameters: Vec<(String, String)>,
}

/// Records script runs instead of starting a script host.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<ScriptCall>>,
    fail_on: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Runner that fails whenever a script with this file name runs.
    pub fn failing(script_name: &str) -> Rc<Self> {
        Rc::new(Self {
            calls: RefCell::new(Vec::new()),
            fail_on: Some(script_name.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<ScriptCall> {
        self.calls.borrow().clone()
    }
}

impl ScriptRunner for RecordingRunner {
    fn run(
        &self,
        script: &Path,
        working_dir: &Path,
        parameters: &[(&str, &str)],
    ) -> Result<(), DeployError> {
        let name = script
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(ScriptCall {
            script: name.clone(),
            working_dir: working_dir.to_path_buf(),
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        if self.fail_on.as_deref() == Some(name.as_str()) {
            return Err(DeployError::ExternalProcess {
                program: "recording".to_string(),
                detail: format!("{name} exited with code 1"),
            });
        }
        Ok(())
    }
}

/// Temp folders for one test: startup folder, config folder, a single
/// configured repository named `local`, and a recording script runner.
pub struct Fixture {
    pub temp: TempDir,
    pub ctx: AppContext,
    pub runner: Rc<RecordingRunner>,
    pub repository: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_runner(RecordingRunner::new())
    }

    pub fn with_runner(runner: Rc<RecordingRunner>) -> Self {
        let temp = TempDir::new().unwrap();
        let info = ApplicationInformation {
            startup_folder: temp.path().join("apps"),
            config_folder: temp.path().join("config"),
            packaging_folder: temp.path().join("packages"),
        };
        let repository = temp.path().join("repo");
        let ctx = AppContext::new(info, Settings::default()).with_script_runner(runner.clone());
        ctx.source_store().add("local", &repository).unwrap();

        Self {
            temp,
            ctx,
            runner,
            repository,
        }
    }

    pub fn startup(&self) -> &Path {
        &self.ctx.info().startup_folder
    }

    pub fn folder(&self, id: &str, version: &str) -> PathBuf {
        self.startup().join(format!("{id}.{version}"))
    }

    /// Build output folder with the given files, for packaging.
    pub fn build_output(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let output = self.temp.path().join("build").join(name);
        for (rel, content) in files {
            let path = output.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        output
    }

    /// Package `files` as `id` `version` straight into the repository.
    pub fn publish(&self, id: &str, version: &str, files: &[(&str, &str)]) -> PathBuf {
        let output = self.build_output(&format!("{id}.{version}"), files);
        PackageBuilder::new(self.repository.clone())
            .build(
                &output,
                id,
                &SemanticVersion::parse(version).unwrap(),
                Vec::new(),
            )
            .unwrap()
    }
}

pub fn version(text: &str) -> SemanticVersion {
    SemanticVersion::parse(text).unwrap()
}
