//! Application context for dependency injection.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use tracing::debug;

use crate::config::{ConfigStore, DEFAULT_PACKAGING_FOLDER_NAME, Settings, store::default_config_dir};
use crate::installation::{
    InstallationStatusProvider, PackageCleaner, PackageInstaller, PackageUninstaller,
};
use crate::manifest::{ManifestAccess, ManifestStore};
use crate::packaging::PackageBuilder;
use crate::repository::{SourceRepositories, SourceStore};
use crate::scripts::{PowerShellRunner, ScriptNames, ScriptRunner};

/// Folders the application works in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInformation {
    /// Package versions are installed as `{startup_folder}/{id}.{version}`.
    pub startup_folder: PathBuf,
    /// Holds `rollout.toml`, `packages.json` and `sources.json`.
    pub config_folder: PathBuf,
    pub packaging_folder: PathBuf,
}

impl ApplicationInformation {
    /// Resolve folders: explicit values, then settings, then defaults.
    pub fn resolve(
        config_folder: PathBuf,
        install_root: Option<PathBuf>,
        settings: &Settings,
    ) -> anyhow::Result<Self> {
        let startup_folder = match install_root.or_else(|| settings.install_root.clone()) {
            Some(root) => root,
            None => executable_folder()?,
        };
        let packaging_folder = settings
            .packaging_folder
            .clone()
            .unwrap_or_else(|| startup_folder.join(DEFAULT_PACKAGING_FOLDER_NAME));

        Ok(Self {
            startup_folder,
            config_folder,
            packaging_folder,
        })
    }
}

fn executable_folder() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("Could not determine the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("Executable has no parent folder: {}", exe.display()))
}

/// Hands out the services commands need. Frontends create this once and
/// pass it to the command provider.
#[derive(Clone)]
pub struct AppContext {
    info: ApplicationInformation,
    settings: Settings,
    manifest: Rc<dyn ManifestAccess>,
    runner: Rc<dyn ScriptRunner>,
}

impl AppContext {
    pub fn new(info: ApplicationInformation, settings: Settings) -> Self {
        let manifest: Rc<dyn ManifestAccess> =
            Rc::new(ManifestStore::in_folder(&info.config_folder));
        let runner: Rc<dyn ScriptRunner> = Rc::new(PowerShellRunner::new(settings.script_host()));
        Self {
            info,
            settings,
            manifest,
            runner,
        }
    }

    /// Load settings from `config_dir` (default: the platform config
    /// directory) and resolve folders, with `install_root` taking precedence
    /// over the configured value.
    pub fn from_overrides(
        config_dir: Option<PathBuf>,
        install_root: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let config_folder = match config_dir {
            Some(dir) => dir,
            None => default_config_dir()?,
        };
        let settings = ConfigStore::in_folder(&config_folder).load()?;
        let info = ApplicationInformation::resolve(config_folder, install_root, &settings)?;
        debug!(
            startup = %info.startup_folder.display(),
            config = %info.config_folder.display(),
            packaging = %info.packaging_folder.display(),
            "Resolved application folders"
        );
        Ok(Self::new(info, settings))
    }

    pub fn with_script_runner(mut self, runner: Rc<dyn ScriptRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn info(&self) -> &ApplicationInformation {
        &self.info
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn script_names(&self) -> ScriptNames {
        self.settings.script_names()
    }

    pub fn manifest(&self) -> Rc<dyn ManifestAccess> {
        Rc::clone(&self.manifest)
    }

    pub fn source_store(&self) -> SourceStore {
        SourceStore::in_folder(&self.info.config_folder)
    }

    /// Repositories configured in `sources.json`, read at call time.
    pub fn repositories(&self) -> anyhow::Result<SourceRepositories> {
        Ok(SourceRepositories::from_sources(&self.source_store().list()?))
    }

    pub fn status_provider(&self) -> InstallationStatusProvider {
        InstallationStatusProvider::new(self.manifest(), self.info.startup_folder.clone())
    }

    pub fn uninstaller(&self) -> PackageUninstaller {
        PackageUninstaller::new(
            self.status_provider(),
            self.manifest(),
            Rc::clone(&self.runner),
            self.script_names().remove,
        )
    }

    pub fn installer(&self) -> anyhow::Result<PackageInstaller> {
        Ok(PackageInstaller::new(
            self.status_provider(),
            self.uninstaller(),
            Rc::new(self.repositories()?),
            self.manifest(),
            Rc::clone(&self.runner),
            self.script_names().deploy,
        ))
    }

    pub fn cleaner(&self) -> PackageCleaner {
        PackageCleaner::new(self.status_provider())
    }

    pub fn package_builder(&self) -> PackageBuilder {
        PackageBuilder::new(self.info.packaging_folder.clone())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("info", &self.info)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
