use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;
use text2mcpl_core::container::{McplParticle, read_container};

#[test]
fn single_record_along_x_is_written_as_neutron() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 1 0 0 5.0\n");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_success(&result);
    let particles = read_particles(&temp.path().join("out.mcpl.gz"));
    assert_eq!(particles.len(), 1);
    assert_direction(&particles[0], [1.0, 0.0, 0.0]);
    assert_eq!(particles[0].ekin, 5.0);
    assert_eq!(particles[0].pdgcode, 2112);
    assert_eq!(particles[0].weight, 1.0);
}

#[test]
fn zero_momentum_record_is_skipped_with_diagnostic() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "1 2 3 0 0 0 2.0\n");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_success(&result);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("momentum length is zero"),
        "stderr should report the zero-momentum rejection, stderr: {}",
        stderr
    );
    assert!(read_particles(&temp.path().join("out.mcpl.gz")).is_empty());
}

#[test]
fn three_four_momentum_normalizes_to_unit_direction() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 3 4 0 1.0\n");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(
        temp.path(),
        &[input.as_path(), output.as_path(), Path::new("--double-precision")],
    );

    assert_success(&result);
    let particles = read_particles(&temp.path().join("out.mcpl.gz"));
    assert_eq!(particles.len(), 1);
    assert_direction(&particles[0], [0.6, 0.8, 0.0]);
    assert_eq!(particles[0].ekin, 1.0);
}

#[test]
fn malformed_trailing_line_ends_input_with_success() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(
        temp.path(),
        "0 0 0 1 0 0 5.0\n0 0 0 3 4 0 1.0\n0 0 0 0 0 1 2.5\n1 2 3 4\n",
    );
    let output = temp.path().join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_success(&result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(
        stdout.contains("Particles written: 3"),
        "stdout should summarize accepted particles, stdout: {}",
        stdout
    );
    assert!(stdout.contains("Input ended at malformed line 4"));

    let particles = read_particles(&temp.path().join("out.mcpl.gz"));
    assert_eq!(
        particles.iter().map(|particle| particle.ekin).collect::<Vec<_>>(),
        vec![5.0, 1.0, 2.5]
    );
}

#[test]
fn non_utf8_trailing_line_keeps_earlier_records() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("hits.txt");
    let mut content = b"0 0 0 1 0 0 5.0\n0 0 0 3 4 0 1.0\n# d".to_vec();
    content.push(0xe9);
    content.extend_from_slice(b"tecteur\n");
    fs::write(&input, content).expect("input should be written");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(
        temp.path(),
        &[input.as_path(), output.as_path(), Path::new("--no-gzip")],
    );

    assert_success(&result);
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(
        stdout.contains("Input ended at malformed line 3"),
        "stdout: {}",
        stdout
    );
    let (info, particles) = read_container(&output).expect("container should be readable");
    assert_eq!(info.particle_count, 2);
    assert_eq!(
        particles.iter().map(|particle| particle.ekin).collect::<Vec<_>>(),
        vec![5.0, 1.0]
    );
}

#[test]
fn negative_kinetic_energy_is_written_as_magnitude_with_warning() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 0 0 -1 -2.5\n");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_success(&result);
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("negative kinetic energy is stored as its magnitude"),
        "stderr should flag the sign loss, stderr: {}",
        stderr
    );
    let particles = read_particles(&temp.path().join("out.mcpl.gz"));
    assert_eq!(particles.len(), 1);
    assert_eq!(particles[0].ekin, 2.5);
    assert_direction(&particles[0], [0.0, 0.0, -1.0]);
}

#[test]
fn wrong_argument_count_fails_without_creating_files() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 1 0 0 5.0\n");

    let result = run_cli(temp.path(), &[&input]);

    assert_eq!(
        result.status.code(),
        Some(1),
        "missing output argument should exit 1, stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("INPUT.CLI_USAGE"));
    assert!(stderr.contains("FATAL EXIT CODE: 1"));

    let entries = fs::read_dir(temp.path())
        .expect("tempdir should be listable")
        .count();
    assert_eq!(entries, 1, "only the input file should exist");
}

#[test]
fn unreadable_input_exits_one_before_touching_output() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = temp.path().join("missing.txt");
    let output = temp.path().join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("ERROR: [IO.INPUT_OPEN]"),
        "stderr should carry the input-open diagnostic, stderr: {}",
        stderr
    );
    assert!(!output.exists());
    assert!(!temp.path().join("out.mcpl.gz").exists());
}

#[test]
fn unwritable_output_is_a_container_failure() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 1 0 0 5.0\n");
    let output = temp.path().join("no-such-dir").join("out.mcpl");

    let result = run_cli(temp.path(), &[&input, &output]);

    assert_eq!(result.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("CONTAINER.CREATE"), "stderr: {}", stderr);
}

#[test]
fn header_carries_output_name_and_comment() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(temp.path(), "0 0 0 0 0 1 1.0\n");
    let output = temp.path().join("neutrons");

    let result = run_cli(
        temp.path(),
        &[input.as_path(), output.as_path(), Path::new("--no-gzip")],
    );

    assert_success(&result);
    let container = temp.path().join("neutrons.mcpl");
    assert!(container.is_file());
    assert!(!temp.path().join("neutrons.mcpl.gz").exists());

    let (info, particles) = read_container(&container).expect("container should be readable");
    assert_eq!(info.header.source_name, output.to_string_lossy());
    assert_eq!(
        info.header.comments,
        vec!["Extracting Neutrons from the txt file".to_string()]
    );
    assert_eq!(info.particle_count, 1);
    assert_eq!(particles.len(), 1);
}

#[test]
fn repeated_runs_produce_identical_particles() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(
        temp.path(),
        "0 0 0 1 0 0 5.0\n1 2 3 0 0 0 2.0\n0 0 0 3 4 0 1.0\n0 0 0 nan 0 0 1.0\n",
    );

    let mut runs = Vec::new();
    for name in ["first.mcpl", "second.mcpl"] {
        let output = temp.path().join(name);
        let result = run_cli(temp.path(), &[&input, &output]);
        assert_success(&result);
        runs.push(read_particles(&temp.path().join(format!("{name}.gz"))));
    }

    assert_eq!(runs[0].len(), 2);
    assert_eq!(runs[0], runs[1]);
}

#[test]
fn summary_flag_writes_json_report() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input = write_input(
        temp.path(),
        "0 0 0 1 0 0 5.0\n1 2 3 0 0 0 2.0\n0 0 0 inf 0 0 1.0\n",
    );
    let output = temp.path().join("out.mcpl");
    let summary = temp.path().join("report").join("summary.json");

    let result = run_cli(
        temp.path(),
        &[
            input.as_path(),
            output.as_path(),
            Path::new("--summary"),
            summary.as_path(),
        ],
    );

    assert_success(&result);
    let parsed: Value =
        serde_json::from_str(&fs::read_to_string(&summary).expect("summary should exist"))
            .expect("summary should be valid JSON");
    assert_eq!(parsed["records_read"], 3);
    assert_eq!(parsed["accepted"], 1);
    assert_eq!(parsed["rejected_zero_momentum"], 1);
    assert_eq!(parsed["rejected_non_unit_direction"], 1);
    assert_eq!(parsed["pdg_code"], 2112);
    assert_eq!(parsed["compressed"], true);
    assert_eq!(parsed["termination"]["kind"], "end_of_input");
}

fn write_input(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("hits.txt");
    fs::write(&path, content).expect("input should be written");
    path
}

fn read_particles(path: &Path) -> Vec<McplParticle> {
    let (_, particles) = read_container(path).expect("container should be readable");
    particles
}

fn assert_direction(particle: &McplParticle, expected: [f64; 3]) {
    for axis in 0..3 {
        assert!(
            (particle.direction[axis] - expected[axis]).abs() < 1.0e-6,
            "direction {:?} should be close to {:?}",
            particle.direction,
            expected
        );
    }
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn run_cli<P: AsRef<Path>>(working_dir: &Path, args: &[P]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_text2mcpl"))
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .args(args.iter().map(|arg| arg.as_ref().as_os_str()))
        .output()
        .expect("text2mcpl should run")
}
