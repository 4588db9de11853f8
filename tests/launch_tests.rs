//! Target decoding, launch modes and reloads racing with launches.

mod common;

use common::{Fixture, profiles_json};
use parking_lot::Mutex;
use std::path::PathBuf;
use term_profiles::error::LaunchError;
use term_profiles::launch::{Invocation, LaunchMode, ProcessLauncher};
use term_profiles_config::MemorySettings;

/// Records invocations instead of starting processes.
#[derive(Default)]
struct RecordingLauncher {
    launched: Mutex<Vec<Invocation>>,
}

impl ProcessLauncher for RecordingLauncher {
    fn launch(&self, invocation: &Invocation) -> Result<(), LaunchError> {
        self.launched.lock().push(invocation.clone());
        Ok(())
    }
}

fn beta_fixture() -> (Fixture, MemorySettings, PathBuf) {
    let fx = Fixture::new();
    let (_, exe) = fx.install("beta", &profiles_json(&[("{G1}", "PowerShell")]));
    let store = fx.explicit_section(MemorySettings::new(), "beta", "Beta: ");
    (fx, store, exe)
}

#[test]
fn test_every_mode_builds_expected_invocation() {
    let (fx, store, exe) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);

    let open = plugin.invocation("beta::{G1}", None).unwrap();
    assert_eq!(open.program, exe);
    assert_eq!(open.args, vec!["--profile", "{G1}"]);
    assert!(!open.elevate);

    let tab = plugin
        .invocation("beta::{G1}", Some(LaunchMode::OpenNewTab.action_name()))
        .unwrap();
    assert_eq!(tab.args, vec!["-w", "0", "new-tab", "--profile", "{G1}"]);

    let elevated = plugin
        .invocation("beta::{G1}", Some(LaunchMode::Elevate.action_name()))
        .unwrap();
    assert_eq!(elevated.program, PathBuf::from("cmd.exe"));
    assert_eq!(
        elevated.args,
        vec![
            "/c".to_string(),
            "start".to_string(),
            String::new(),
            "/b".to_string(),
            exe.display().to_string(),
            "--profile".to_string(),
            "{G1}".to_string(),
        ]
    );
    assert!(elevated.elevate);
}

#[test]
fn test_execute_hands_invocation_to_launcher() {
    let (fx, store, _) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);

    let launcher = RecordingLauncher::default();
    let target = plugin.catalog().items[0].target.clone();
    plugin
        .execute(&target, Some("wt.elevate"), &launcher)
        .unwrap();

    let launched = launcher.launched.lock();
    assert_eq!(launched.len(), 1);
    assert!(launched[0].elevate);
}

#[test]
fn test_launch_after_reload_removed_instance() {
    let (fx, store, _) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);
    let target = plugin.catalog().items[0].target.clone();

    // The item was listed before the reload; launching it afterwards must
    // fail cleanly.
    plugin.reload(&MemorySettings::new());

    let launcher = RecordingLauncher::default();
    let err = plugin.execute(&target, None, &launcher).unwrap_err();
    assert!(matches!(err, LaunchError::UnknownInstance(ref name) if name == "beta"));
    assert!(launcher.launched.lock().is_empty());
}

#[test]
fn test_launch_after_stop() {
    let (fx, store, _) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);
    plugin.stop();

    assert!(matches!(
        plugin.invocation("beta::{G1}", None),
        Err(LaunchError::UnknownInstance(_))
    ));
}

#[test]
fn test_malformed_target() {
    let (fx, store, _) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);

    assert!(matches!(
        plugin.invocation("beta-{G1}", None),
        Err(LaunchError::MalformedTarget(ref t)) if t == "beta-{G1}"
    ));
}

#[test]
fn test_unknown_guid_is_passed_through() {
    let (fx, store, _) = beta_fixture();
    let mut plugin = fx.plugin();
    plugin.start(&store);

    let inv = plugin.invocation("beta::{NOT-A-PROFILE}", None).unwrap();
    assert_eq!(inv.args, vec!["--profile", "{NOT-A-PROFILE}"]);
}
