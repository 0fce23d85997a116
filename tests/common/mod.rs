//! Runs tests using actual binary, apapted from 'fd' method: https://github.com/sharkdp/fd/blob/master/tests/testenv/mod.rs
#![allow(dead_code)]
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process;

// if changing RawRecord, update the dump with `--from-json TEST_DUMP --dump > file.json`
/// Dump of a Windows system with PCIe, CP2102N, FTDI and Bluetooth serial ports
pub const WINDOWS_DUMP: &str = "./tests/data/windows_dump.json";
/// Output of `-list` for [`WINDOWS_DUMP`]
pub const LIST_OUTPUT: &str = "./tests/data/list.txt";
/// Config enabling ascii output
pub const ASCII_CONFIG: &str = "./tests/data/config.json";

pub fn read_dump(file_name: &str) -> BufReader<File> {
    let f = File::open(file_name).expect("Unable to open json dump file");
    BufReader::new(f)
}

pub fn read_dump_to_string(file_name: &str) -> String {
    let mut ret = String::new();
    let mut br = read_dump(file_name);
    br.read_to_string(&mut ret)
        .unwrap_or_else(|_| panic!("Failed to read {}", file_name));
    ret
}

pub fn dump_from_windows() -> comdesc::collector::DeviceDump {
    comdesc::collector::read_json_dump(WINDOWS_DUMP).unwrap()
}

/// Environment for the integration tests.
pub struct TestEnv {
    /// Path to the *comdesc* executable.
    comdesc_exe: PathBuf,
    /// Sort lines before comparing, for output where order is not under test
    sort_lines: bool,
}

/// Find the *comdesc* executable.
fn find_comdesc_exe() -> PathBuf {
    // Tests exe is in target/debug/deps, the *comdesc* exe is in target/debug
    let root = env::current_exe()
        .expect("tests executable")
        .parent()
        .expect("tests executable directory")
        .parent()
        .expect("comdesc executable directory")
        .to_path_buf();

    let exe_name = if cfg!(windows) {
        "comdesc.exe"
    } else {
        "comdesc"
    };

    root.join(exe_name)
}

/// Format an error message for when *comdesc* exited with an unexpected status.
fn format_exit_error(args: &[&str], output: &process::Output) -> String {
    format!(
        "`comdesc {}` exited with {}.\nstdout:\n---\n{}---\nstderr:\n---\n{}---",
        args.join(" "),
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Format an error message for when the output of *comdesc* did not match the expected output.
fn format_output_error(args: &[&str], expected: &str, actual: &str) -> String {
    // Generate diff text.
    let diff_text = diff::lines(expected, actual)
        .into_iter()
        .map(|diff| match diff {
            diff::Result::Left(l) => format!("-{}", l),
            diff::Result::Both(l, _) => format!(" {}", l),
            diff::Result::Right(r) => format!("+{}", r),
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        concat!(
            "`comdesc {}` did not produce the expected output.\n",
            "Showing diff between expected and actual:\n{}\n"
        ),
        args.join(" "),
        diff_text
    )
}

/// Normalize the output for comparison.
fn normalize_output(s: &str, sort_lines: bool) -> String {
    let mut lines = s.replace("\r\n", "\n").lines().map(String::from).collect::<Vec<_>>();

    if sort_lines {
        lines.sort();
    }
    lines.join("\n")
}

impl TestEnv {
    pub fn new() -> TestEnv {
        TestEnv {
            comdesc_exe: find_comdesc_exe(),
            sort_lines: false,
        }
    }

    pub fn sort_lines(self, sort_lines: bool) -> TestEnv {
        TestEnv {
            comdesc_exe: self.comdesc_exe,
            sort_lines,
        }
    }

    /// Get the path of the comdesc executable.
    #[cfg_attr(windows, allow(unused))]
    pub fn test_exe(&self) -> &PathBuf {
        &self.comdesc_exe
    }

    /// Run *comdesc* with `args`, replaying `dump_file` if passed
    pub fn run(&self, dump_file: Option<&str>, args: &[&str]) -> process::Output {
        let mut cmd = process::Command::new(&self.comdesc_exe);
        if let Some(dump) = dump_file {
            cmd.arg("--from-json").arg(dump);
        }
        // no user config or colour leaking into comparisons
        cmd.args(args)
            .env("NO_COLOR", "1")
            .env(
                "XDG_CONFIG_HOME",
                concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/no_config"),
            )
            .env_remove("RUST_LOG");

        cmd.output().expect("comdesc output")
    }

    /// Assert that calling *comdesc* with the specified arguments exits with `code` and return the output.
    pub fn assert_exit_code(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        code: i32,
    ) -> process::Output {
        let output = self.run(dump_file, args);

        if output.status.code() != Some(code) {
            panic!("{}", format_exit_error(args, &output));
        }

        output
    }

    pub fn assert_success_and_get_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
    ) -> process::Output {
        self.assert_exit_code(dump_file, args, 0)
    }

    pub fn assert_success_and_get_normalized_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
    ) -> String {
        let output = self.assert_success_and_get_output(dump_file, args);
        normalize_output(&String::from_utf8_lossy(&output.stdout), self.sort_lines)
    }

    /// Assert that calling *comdesc* with the specified arguments produces the expected output.
    pub fn assert_output(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        expected: &str,
        contains: bool,
    ) {
        // Don't touch if doing contains
        let (expected, actual) = if contains {
            let output = self.assert_success_and_get_output(dump_file, args);
            (
                expected.to_string(),
                String::from_utf8_lossy(&output.stdout).to_string(),
            )
        // Normalize both expected and actual output.
        } else {
            (
                normalize_output(expected, self.sort_lines),
                self.assert_success_and_get_normalized_output(dump_file, args),
            )
        };

        // Compare actual output to expected output.
        if contains {
            if !actual.contains(&expected) {
                panic!("{}", format_output_error(args, &expected, &actual));
            }
        } else if expected != actual {
            panic!("{}", format_output_error(args, &expected, &actual));
        }
    }

    /// Assert the JSON output of *comdesc* includes `expected`
    pub fn assert_output_json(
        &self,
        dump_file: Option<&str>,
        args: &[&str],
        expected: serde_json::Value,
    ) {
        let output = self.assert_success_and_get_output(dump_file, args);
        let actual: serde_json::Value = serde_json::from_slice(&output.stdout)
            .unwrap_or_else(|e| panic!("`comdesc {}` not JSON: {}", args.join(" "), e));

        assert_json_diff::assert_json_include!(actual: actual, expected: expected);
    }
}
