use super::*;
use crate::config::TargetConfig;
use crate::test_support::{FakeDirectory, FakeProcess, SignalSent};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

const PORT: u16 = 443;
const SIGNATURE: &str = "app.py";

fn reaper(directory: Arc<FakeDirectory>) -> ProcessReaper {
    ProcessReaper::new(directory, Duration::from_secs(3), Duration::from_secs(5))
}

#[tokio::test(start_paused = true)]
async fn test_reap_terminates_port_owner_and_signature_matches() {
    let directory = FakeDirectory::new(vec![
        FakeProcess::new(100, "nginx: worker").listening(PORT),
        FakeProcess::new(200, "python app.py"),
        FakeProcess::new(300, "python other.py"),
    ]);

    let report = reaper(directory.clone()).reap(PORT, SIGNATURE).await;

    assert_eq!(report.terminated, vec![100, 200]);
    assert!(report.killed.is_empty());
    assert!(report.is_clean());
    assert_eq!(directory.alive(), vec![300]);
}

#[tokio::test(start_paused = true)]
async fn test_reap_does_not_signal_same_pid_twice() {
    let directory = FakeDirectory::new(vec![
        FakeProcess::new(200, "python app.py").listening(PORT),
    ]);

    let report = reaper(directory.clone()).reap(PORT, SIGNATURE).await;

    assert_eq!(report.terminated, vec![200]);
    assert_eq!(directory.signals(), vec![SignalSent::Term(200)]);
}

#[tokio::test(start_paused = true)]
async fn test_reap_force_kills_survivors_only() {
    let directory = FakeDirectory::new(vec![
        FakeProcess::new(200, "python app.py").stubborn(),
        FakeProcess::new(201, "python app.py --worker"),
    ]);

    let report = reaper(directory.clone()).reap(PORT, SIGNATURE).await;

    assert_eq!(report.terminated, vec![200, 201]);
    assert_eq!(report.killed, vec![200]);
    assert_eq!(
        directory.signals(),
        vec![SignalSent::Term(200), SignalSent::Term(201), SignalSent::Kill(200)]
    );
    assert!(directory.alive().is_empty());
    assert_eq!(report.touched(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_reap_continues_after_signal_failure() {
    let directory = FakeDirectory::new(vec![
        FakeProcess::new(100, "system daemon").listening(PORT).protected(),
        FakeProcess::new(200, "python app.py"),
    ]);

    let report = reaper(directory.clone()).reap(PORT, SIGNATURE).await;

    assert_eq!(report.terminated, vec![200]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, 100);
    assert!(!report.is_clean());
    assert_eq!(directory.alive(), vec![100]);
}

#[tokio::test(start_paused = true)]
async fn test_reap_waits_grace_and_settle() {
    let directory = FakeDirectory::new(vec![FakeProcess::new(200, "python app.py")]);
    let started = tokio::time::Instant::now();

    reaper(directory).reap(PORT, SIGNATURE).await;

    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(8));
    assert!(elapsed < Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn test_reap_with_nothing_running() {
    let directory = FakeDirectory::new(Vec::new());
    let report = reaper(directory.clone()).reap(PORT, SIGNATURE).await;
    assert_eq!(report, ReapReport::default());
    assert!(directory.signals().is_empty());
}

#[test]
fn test_launch_spec_strips_override_env() {
    let target = TargetConfig {
        program: "python".into(),
        args: vec!["app.py".into()],
        working_dir: "/srv/app".into(),
        ..Default::default()
    };
    let spec = LaunchSpec::from_target(&target);
    let cmd = spec.build_command();

    assert_eq!(cmd.get_program(), OsStr::new("python"));
    assert_eq!(cmd.get_args().collect::<Vec<_>>(), vec![OsStr::new("app.py")]);
    assert_eq!(cmd.get_current_dir(), Some(std::path::Path::new("/srv/app")));

    let removed: Vec<_> = cmd
        .get_envs()
        .filter(|(_, value)| value.is_none())
        .map(|(key, _)| key.to_os_string())
        .collect();
    assert!(removed.contains(&"BACKUP_MODE".into()));
    assert!(removed.contains(&"FORCE_HTTP_PORT".into()));
    assert_eq!(spec.command_line(), "python app.py");
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_launcher_reports_exit() {
    let spec = LaunchSpec {
        program: "sh".into(),
        args: vec!["-c".into(), "exit 3".into()],
        working_dir: std::env::temp_dir(),
        strip_env: Vec::new(),
    };

    let mut process = CommandLauncher::new().launch(&spec).expect("spawn sh");
    assert!(process.pid().is_some());

    let mut exited = None;
    for _ in 0..50 {
        exited = process.try_exited();
        if exited.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let description = exited.expect("sh should have exited");
    assert!(description.contains('3'));
}

#[tokio::test]
async fn test_command_launcher_spawn_error() {
    let spec = LaunchSpec {
        program: "definitely-not-a-real-binary-vigil".into(),
        args: Vec::new(),
        working_dir: std::env::temp_dir(),
        strip_env: Vec::new(),
    };

    let err = CommandLauncher::new().launch(&spec).err().expect("spawn should fail");
    assert!(matches!(
        err,
        vigil_types::VigilError::Relaunch(vigil_types::RelaunchFailure::SpawnError(_))
    ));
}
