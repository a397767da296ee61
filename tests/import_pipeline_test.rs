use assert_cmd::Command;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

fn write_script(bin_path: &Path, script: &str) {
    fs::write(bin_path, script).expect("write fake tool");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(bin_path).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(bin_path, perms).expect("chmod");
    }
}

/// The first tag candidate is absent; the second answers. Exercises the
/// probe's query-failure swallowing along the way.
fn write_fake_exiftool(bin_path: &Path) {
    let script = r#"#!/usr/bin/env bash
tag="${3#-}"
case "$tag" in
  CreateDate)
    echo "-QuickTime:CreateDate=2014:06:01 10:15:30"
    exit 0
    ;;
  *)
    exit 1
    ;;
esac
"#;
    write_script(bin_path, script);
}

fn write_silent_exiftool(bin_path: &Path) {
    write_script(bin_path, "#!/usr/bin/env bash\nexit 1\n");
}

/// Logs its argv and creates the output file (the last argument).
fn write_fake_ffmpeg(bin_path: &Path) {
    let script = r#"#!/usr/bin/env bash
if [[ -n "${GPV_TEST_FFMPEG_LOG:-}" ]]; then
  printf '%s\n' "$*" >> "${GPV_TEST_FFMPEG_LOG}"
fi
for last; do :; done
echo data > "$last"
exit 0
"#;
    write_script(bin_path, script);
}

fn write_failing_ffmpeg(bin_path: &Path) {
    write_script(bin_path, "#!/usr/bin/env bash\nexit 1\n");
}

struct TestEnv {
    tmp: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            tmp: tempfile::tempdir().expect("tempdir"),
        }
    }

    fn path(&self) -> &Path {
        self.tmp.path()
    }

    fn src_dir(&self, names: &[&str]) -> PathBuf {
        let dir = self.path().join("src");
        fs::create_dir_all(&dir).expect("mkdir src");
        for name in names {
            fs::write(dir.join(name), format!("clip:{name}")).expect("write clip");
        }
        dir
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("gpv").expect("binary");
        cmd.current_dir(self.path())
            .env("GPV_CONFIG_PATH", self.path().join("no-config.toml"))
            .env("GPV_SCRATCH_DIR", self.path())
            .env("GPV_EXIFTOOL_BIN", self.path().join("exiftool"))
            .env("GPV_FFMPEG_BIN", self.path().join("ffmpeg"));
        cmd
    }
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read out dir")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.starts_with("gpv."))
        .collect();
    names.sort();
    names
}

#[test]
fn chaptered_recording_is_concatenated_then_deduped_on_rerun() {
    let env = TestEnv::new();
    write_fake_exiftool(&env.path().join("exiftool"));
    write_fake_ffmpeg(&env.path().join("ffmpeg"));
    let src = env.src_dir(&["GOPR1234.MP4", "GP011234.MP4", "GP021234.MP4"]);
    let out = env.path().join("out");
    let log = env.path().join("ffmpeg.log");

    env.cmd()
        .env("GPV_TEST_FFMPEG_LOG", &log)
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("mode=concat-copy"))
        .stdout(predicates::str::contains(
            "imported=1 skipped=0 failed=0",
        ));

    assert_eq!(
        output_names(&out),
        vec!["gpv.2014.06.01_10.15.30.GOPR1234.ch00-02.mp4"]
    );

    let ffmpeg_args = fs::read_to_string(&log).expect("ffmpeg log");
    assert!(ffmpeg_args.contains("-f concat"));
    assert!(ffmpeg_args.contains("-safe 0"));
    assert!(ffmpeg_args.contains("-c copy"));
    assert!(ffmpeg_args.contains("creation_time=2014-06-01T10:15:30"));

    // scratch manifest is cleaned up after the recording completes
    let leftover: Vec<_> = fs::read_dir(env.path())
        .expect("read scratch")
        .flatten()
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|n| n.ends_with(".chaps"))
        .collect();
    assert!(leftover.is_empty(), "leftover manifests: {leftover:?}");

    // second run over the same source finds the identifier in the ledger
    env.cmd()
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("skipped-duplicate"))
        .stdout(predicates::str::contains(
            "imported=0 skipped=1 failed=0",
        ));

    assert_eq!(output_names(&out).len(), 1, "rerun must not add artifacts");
}

#[test]
fn single_chapter_recording_is_copied_with_capture_mtime() {
    let env = TestEnv::new();
    write_fake_exiftool(&env.path().join("exiftool"));
    let src = env.src_dir(&["GOPR0042.MP4"]);
    let out = env.path().join("out");

    env.cmd()
        .arg("import")
        .arg(src.join("GOPR0042.MP4"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("mode=copy"))
        .stdout(predicates::str::contains("timestamp=metadata"));

    let artifact = out.join("gpv.2014.06.01_10.15.30.GOPR0042.mp4");
    assert_eq!(
        fs::read_to_string(&artifact).expect("artifact"),
        "clip:GOPR0042.MP4"
    );

    let expected: SystemTime = chrono::NaiveDate::from_ymd_opt(2014, 6, 1)
        .unwrap()
        .and_hms_opt(10, 15, 30)
        .unwrap()
        .and_local_timezone(Local)
        .single()
        .expect("local time")
        .into();
    let modified = fs::metadata(&artifact)
        .expect("metadata")
        .modified()
        .expect("mtime");
    let drift = modified
        .duration_since(expected)
        .unwrap_or_else(|e| e.duration());
    assert!(drift <= Duration::from_secs(1), "mtime drift: {drift:?}");
}

#[test]
fn missing_metadata_falls_back_to_file_mtime() {
    let env = TestEnv::new();
    write_silent_exiftool(&env.path().join("exiftool"));
    let src = env.src_dir(&["GOPR0077.MP4"]);
    let out = env.path().join("out");

    let mtime = UNIX_EPOCH + Duration::from_secs(1_401_617_730);
    let clip = fs::File::options()
        .write(true)
        .open(src.join("GOPR0077.MP4"))
        .expect("open clip");
    clip.set_modified(mtime).expect("set mtime");
    drop(clip);

    env.cmd()
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicates::str::contains("timestamp=file-mtime"));

    let stamp = DateTime::<Local>::from(mtime)
        .naive_local()
        .format("%Y.%m.%d_%H.%M.%S");
    assert!(out.join(format!("gpv.{stamp}.GOPR0077.mp4")).is_file());
}

#[test]
fn transcode_failure_stays_inside_its_recording() {
    let env = TestEnv::new();
    write_fake_exiftool(&env.path().join("exiftool"));
    write_failing_ffmpeg(&env.path().join("ffmpeg"));
    // 1234 is chaptered and needs ffmpeg; 5678 is a plain copy
    let src = env.src_dir(&["GOPR1234.MP4", "GP011234.MP4", "GOPR5678.MP4"]);
    let out = env.path().join("out");

    env.cmd()
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .assert()
        .code(2)
        .stdout(predicates::str::contains("transcode-failure"))
        .stdout(predicates::str::contains(
            "imported=1 skipped=0 failed=1",
        ));

    assert_eq!(
        output_names(&out),
        vec!["gpv.2014.06.01_10.15.30.GOPR5678.mp4"]
    );
}

#[test]
fn encode_flag_switches_every_recording_to_the_encoder() {
    let env = TestEnv::new();
    write_fake_exiftool(&env.path().join("exiftool"));
    write_fake_ffmpeg(&env.path().join("ffmpeg"));
    let src = env.src_dir(&["GOPR0042.MP4"]);
    let out = env.path().join("out");
    let log = env.path().join("ffmpeg.log");

    env.cmd()
        .env("GPV_TEST_FFMPEG_LOG", &log)
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .arg("--encode")
        .arg("--crf")
        .arg("20")
        .arg("--scale")
        .arg("1280:-2")
        .assert()
        .success()
        .stdout(predicates::str::contains("mode=concat-encode"));

    let ffmpeg_args = fs::read_to_string(&log).expect("ffmpeg log");
    assert!(ffmpeg_args.contains("-c:v libx264"));
    assert!(ffmpeg_args.contains("-crf 20"));
    assert!(ffmpeg_args.contains("-vf scale=1280:-2"));
    assert!(ffmpeg_args.contains("-c:a copy"));
    assert!(ffmpeg_args.contains("-movflags +faststart"));
    assert!(ffmpeg_args.contains("-map_metadata 0"));
    assert!(!ffmpeg_args.contains("-f concat"));
}

#[test]
fn range_filter_limits_the_candidate_set() {
    let env = TestEnv::new();
    write_fake_exiftool(&env.path().join("exiftool"));
    let src = env.src_dir(&["GOPR0001.MP4", "GOPR0002.MP4", "GOPR0010.MP4"]);
    let out = env.path().join("out");

    env.cmd()
        .arg("import")
        .arg(&src)
        .arg("-o")
        .arg(&out)
        .arg("--range")
        .arg("0001-0002")
        .assert()
        .success()
        .stdout(predicates::str::contains("candidates=2"))
        .stdout(predicates::str::contains(
            "imported=2 skipped=0 failed=0",
        ));

    assert_eq!(output_names(&out).len(), 2);
}
