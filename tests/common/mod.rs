#![allow(dead_code)]

pub mod fake_store;

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

pub fn groupdesk_binary() -> &'static str {
    env!("CARGO_BIN_EXE_groupdesk")
}

/// Helper struct to run groupdesk commands in an isolated temp directory
pub struct GroupdeskTest {
    pub temp_dir: TempDir,
}

impl GroupdeskTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        GroupdeskTest { temp_dir }
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(groupdesk_binary());
        cmd.current_dir(self.temp_dir.path())
            .env("GROUPDESK_ROOT", self.temp_dir.path().join(".groupdesk"))
            .env_remove("GROUPDESK_BASE_URL")
            .env_remove("GROUPDESK_TOKEN")
            .env_remove("GROUPDESK_LOG");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("Failed to execute groupdesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".groupdesk");
        fs::create_dir_all(&dir).expect("Failed to create .groupdesk directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.temp_dir.path().join(".groupdesk").join("config.yaml")).ok()
    }
}
