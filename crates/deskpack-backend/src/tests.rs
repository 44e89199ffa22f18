use super::*;

fn outcome(exit_code: i32, stdout: &str, stderr: &str) -> BackendOutcome {
    BackendOutcome {
        exit_code,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

#[test]
fn combined_output_joins_trimmed_streams() {
    let joined = outcome(0, "  2 upgrades available \n", " warning: slow source \n");
    assert_eq!(
        joined.combined_output(),
        "2 upgrades available\nwarning: slow source"
    );

    let stdout_only = outcome(0, "done", "");
    assert_eq!(stdout_only.combined_output(), "done");

    let stderr_only = outcome(1, "", "failure");
    assert_eq!(stderr_only.combined_output(), "failure");

    let empty = outcome(0, " ", "\n");
    assert_eq!(empty.combined_output(), "");
}

#[test]
fn succeeded_follows_exit_code() {
    assert!(outcome(0, "", "").succeeded());
    assert!(!outcome(1, "", "").succeeded());
    assert!(!outcome(-1, "", "").succeeded());
}

#[test]
fn noop_phrases_match_case_insensitively() {
    assert!(is_noop_output("No applicable update found."));
    assert!(is_noop_output("no APPLICABLE update FOUND"));
    assert!(is_noop_output(
        "Checking sources...\nNo installed package found matching input criteria."
    ));
    assert!(!is_noop_output("Version 2.0 available"));
    assert!(!is_noop_output(""));
}

#[test]
fn install_args_carry_consent_flags() {
    let args = WingetBackend::install_args("7zip.7zip");
    assert_eq!(
        args,
        vec![
            "install",
            "--id",
            "7zip.7zip",
            "--exact",
            "--disable-interactivity",
            "--silent",
            "--accept-package-agreements",
            "--accept-source-agreements",
        ]
    );
}

#[test]
fn upgrade_check_args_omit_consent_flags() {
    let args = WingetBackend::upgrade_args("VideoLAN.VLC", UpgradeMode::Check);
    assert_eq!(
        args,
        vec![
            "upgrade",
            "--id",
            "VideoLAN.VLC",
            "--exact",
            "--disable-interactivity",
        ]
    );
}

#[test]
fn upgrade_apply_args_carry_consent_flags() {
    let args = WingetBackend::upgrade_args("VideoLAN.VLC", UpgradeMode::Apply);
    assert!(args.contains(&"--silent".to_string()));
    assert!(args.contains(&"--accept-package-agreements".to_string()));
    assert!(args.contains(&"--accept-source-agreements".to_string()));
}

#[test]
fn probe_fails_when_program_missing() {
    let backend = WingetBackend::with_program("deskpack-test-no-such-program");
    let err = backend.probe().expect_err("missing program must be a hard fault");
    assert!(err.to_string().contains("could not be invoked"));
}
