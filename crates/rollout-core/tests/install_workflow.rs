//! Install, update, uninstall and cleanup flows with a recording script
//! runner.

mod support;

use rollout_core::error::DeployError;
use rollout_core::installation::{
    DecisionReason, DeploymentType, InstallOutcome, InstallRequest, UninstallOutcome,
};
use rollout_core::manifest::{ManifestAccess, PackageRecord};
use rollout_core::packaging::{METADATA_FILE_NAME, PackageArchive};
use support::{Fixture, RecordingRunner, version};

const DEPLOY: (&str, &str) = ("deploy.ps1", "Write-Host deploy");
const REMOVE: (&str, &str) = ("remove.ps1", "Write-Host remove");

#[test]
fn installs_latest_version_by_default() {
    let fx = Fixture::new();
    fx.publish("Web.Api", "1.0.0.0", &[DEPLOY, ("bin/app.dll", "v1")]);
    fx.publish("Web.Api", "1.1.0.0", &[DEPLOY, ("bin/app.dll", "v2")]);

    let outcome = fx
        .ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("Web.Api"))
        .unwrap();

    let folder = fx.folder("Web.Api", "1.1.0.0");
    assert_eq!(
        outcome,
        InstallOutcome::Installed {
            version: version("1.1.0.0"),
            folder: folder.clone(),
            replaced: None,
        }
    );
    assert_eq!(std::fs::read_to_string(folder.join("bin/app.dll")).unwrap(), "v2");

    let calls = fx.runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].script, "deploy.ps1");
    assert_eq!(calls[0].working_dir, folder);
    assert_eq!(
        calls[0].parameters,
        vec![("DeploymentType".to_string(), "Full".to_string())]
    );

    assert_eq!(
        fx.ctx.manifest().records().unwrap(),
        vec![PackageRecord::new("Web.Api", "1.1.0.0")]
    );
    let installed = fx.ctx.status_provider().installed_package("web.api").unwrap().unwrap();
    assert_eq!(installed.version, version("1.1.0.0"));
}

#[test]
fn installs_requested_version() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY]);
    fx.publish("App", "2.0", &[DEPLOY]);

    let outcome = fx
        .ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("App").version(Some(version("1.0"))))
        .unwrap();
    assert!(matches!(outcome, InstallOutcome::Installed { version, .. } if version.to_string() == "1.0"));
}

#[test]
fn same_or_older_version_is_skipped() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY]);
    fx.publish("App", "2.0", &[DEPLOY]);
    let installer = fx.ctx.installer().unwrap();
    installer.install(&InstallRequest::new("App")).unwrap();

    for requested in ["2.0", "1.0"] {
        let outcome = installer
            .install(&InstallRequest::new("App").version(Some(version(requested))))
            .unwrap();
        assert_eq!(
            outcome,
            InstallOutcome::AlreadyInstalled {
                requested: version(requested),
                installed: Some(version("2.0")),
                reason: DecisionReason::SameOrNewerInstalled,
            }
        );
    }
    assert_eq!(fx.runner.calls().len(), 1);
}

#[test]
fn full_deployment_uninstalls_previous_version() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY, REMOVE]);
    fx.publish("App", "2.0", &[DEPLOY, REMOVE]);
    let installer = fx.ctx.installer().unwrap();

    installer
        .install(&InstallRequest::new("App").version(Some(version("1.0"))))
        .unwrap();
    let outcome = installer.install(&InstallRequest::new("App")).unwrap();

    assert!(matches!(
        outcome,
        InstallOutcome::Installed { replaced: Some(ref old), .. } if old.to_string() == "1.0"
    ));
    assert!(!fx.folder("App", "1.0").exists());
    assert!(fx.folder("App", "2.0").is_dir());

    let scripts: Vec<(String, std::path::PathBuf)> = fx
        .runner
        .calls()
        .into_iter()
        .map(|call| (call.script, call.working_dir))
        .collect();
    assert_eq!(
        scripts,
        vec![
            ("deploy.ps1".to_string(), fx.folder("App", "1.0")),
            ("remove.ps1".to_string(), fx.folder("App", "1.0")),
            ("deploy.ps1".to_string(), fx.folder("App", "2.0")),
        ]
    );
}

#[test]
fn update_keeps_previous_folder_until_cleanup() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY, REMOVE]);
    fx.publish("App", "2.0", &[DEPLOY, REMOVE]);
    let installer = fx.ctx.installer().unwrap();

    installer
        .install(&InstallRequest::new("App").version(Some(version("1.0"))))
        .unwrap();
    let outcome = installer
        .install(&InstallRequest::new("App").deployment_type(DeploymentType::Update))
        .unwrap();
    assert!(matches!(outcome, InstallOutcome::Installed { replaced: None, .. }));

    let calls = fx.runner.calls();
    assert!(calls.iter().all(|call| call.script == "deploy.ps1"));
    assert_eq!(
        calls[1].parameters,
        vec![("DeploymentType".to_string(), "Update".to_string())]
    );

    let infos = fx.ctx.status_provider().get_package_info_for("App").unwrap();
    assert_eq!(infos.len(), 2);
    assert!(!infos[0].is_installed);
    assert!(infos[1].is_installed);

    let removed = fx.ctx.cleaner().cleanup(Some("App")).unwrap();
    assert_eq!(removed, vec![fx.folder("App", "1.0")]);
    assert!(!fx.folder("App", "1.0").exists());
    assert!(fx.folder("App", "2.0").is_dir());

    assert!(fx.ctx.cleaner().cleanup(None).unwrap().is_empty());
}

#[test]
fn force_reinstalls_same_version() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY]);
    let installer = fx.ctx.installer().unwrap();
    installer.install(&InstallRequest::new("App")).unwrap();

    let folder = fx.folder("App", "1.0");
    std::fs::write(folder.join("local-change.txt"), "edited").unwrap();

    let outcome = installer
        .install(&InstallRequest::new("App").force(true))
        .unwrap();
    assert!(matches!(outcome, InstallOutcome::Installed { replaced: Some(_), .. }));
    assert!(!folder.join("local-change.txt").exists());
    assert_eq!(fx.runner.calls().len(), 2);
}

#[test]
fn stale_folder_is_replaced_on_install() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY]);
    let stale = fx.folder("App", "1.0");
    std::fs::create_dir_all(&stale).unwrap();
    std::fs::write(stale.join("leftover.txt"), "old").unwrap();

    fx.ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("App"))
        .unwrap();
    assert!(!stale.join("leftover.txt").exists());
    assert!(stale.join("deploy.ps1").is_file());
}

#[test]
fn package_without_deploy_script_still_installs() {
    let fx = Fixture::new();
    fx.publish("Static.Site", "3.1", &[("index.html", "<html/>")]);

    fx.ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("Static.Site"))
        .unwrap();
    assert!(fx.runner.calls().is_empty());
    assert!(fx.folder("Static.Site", "3.1").join("index.html").is_file());
}

#[test]
fn missing_package_is_reported() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY]);
    let installer = fx.ctx.installer().unwrap();

    let err = installer.install(&InstallRequest::new("Nope")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::PackageNotFound { version: None, .. })
    ));

    let err = installer
        .install(&InstallRequest::new("App").version(Some(version("9.9"))))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Package 'App' (version 9.9) was not found in any repository"
    );
}

#[test]
fn failing_deploy_script_does_not_record_install() {
    let fx = Fixture::with_runner(RecordingRunner::failing("deploy.ps1"));
    fx.publish("App", "1.0", &[DEPLOY]);

    let err = fx
        .ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("App"))
        .unwrap_err();
    assert!(err.to_string().contains("Deploy script failed"));
    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::ExternalProcess { .. })
    ));
    assert!(fx.ctx.manifest().records().unwrap().is_empty());
}

#[test]
fn corrupt_payload_leaves_no_folder_behind() {
    let fx = Fixture::new();
    let path = fx.publish("App", "1.0", &[DEPLOY, ("bin/app.dll", "v1")]);

    // Same metadata, different payload: the content hash no longer matches.
    let metadata = PackageArchive::open(&path).unwrap().metadata().clone();
    {
        let mut zip = zip::ZipWriter::new(std::fs::File::create(&path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("deploy.ps1", options).unwrap();
        std::io::Write::write_all(&mut zip, b"Write-Host changed").unwrap();
        zip.start_file(METADATA_FILE_NAME, options).unwrap();
        serde_json::to_writer(&mut zip, &metadata).unwrap();
        zip.finish().unwrap();
    }

    let err = fx
        .ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("App"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("payload hash mismatch"), "{err:#}");
    assert!(!fx.folder("App", "1.0").exists());
    assert!(fx.runner.calls().is_empty());
    assert!(fx.ctx.manifest().records().unwrap().is_empty());
}

#[test]
fn uninstall_runs_remove_script_and_forgets_package() {
    let fx = Fixture::new();
    fx.publish("App", "1.0", &[DEPLOY, REMOVE]);
    fx.ctx
        .installer()
        .unwrap()
        .install(&InstallRequest::new("App"))
        .unwrap();

    let outcome = fx.ctx.uninstaller().uninstall("app").unwrap();
    assert_eq!(
        outcome,
        UninstallOutcome::Removed {
            version: version("1.0"),
            folder: fx.folder("App", "1.0"),
            ran_remove_script: true,
        }
    );
    assert!(!fx.folder("App", "1.0").exists());
    assert!(fx.ctx.manifest().records().unwrap().is_empty());
    assert_eq!(fx.runner.calls().last().unwrap().script, "remove.ps1");
}

#[test]
fn uninstall_of_unknown_package_fails() {
    let fx = Fixture::new();
    let err = fx.ctx.uninstaller().uninstall("App").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::NotInstalled { .. })
    ));
}

#[test]
fn uninstall_drops_record_whose_folder_is_gone() {
    let fx = Fixture::new();
    fx.ctx
        .manifest()
        .upsert(PackageRecord::new("App", "1.0"))
        .unwrap();

    let outcome = fx.ctx.uninstaller().uninstall("App").unwrap();
    assert_eq!(
        outcome,
        UninstallOutcome::StaleRecordRemoved {
            recorded_version: "1.0".to_string()
        }
    );
    assert!(fx.ctx.manifest().records().unwrap().is_empty());
}
