//! Integration tests for Pomodoro

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use pomodoro::cache::codec::{encode, CacheRecord};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command isolated from the user's config and cache directory
    fn pomodoro(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("pomodoro");
        cmd.env_remove("POMODORO_CACHE_DIR")
            .env_remove("POMODORO_CONFIG")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-dir")
            .arg(temp.path().join("cache"));
        cmd
    }

    fn write_cache_file(temp: &TempDir, name: &str, namespace: &str) {
        let dir = temp.path().join("cache");
        fs::create_dir_all(&dir).unwrap();
        let mut record = CacheRecord::new(1000, namespace);
        record.entries.insert("k".into(), "Bonjour".into());
        fs::write(dir.join(name), encode(&record).unwrap()).unwrap();
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        pomodoro(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("message-catalog translation lookups"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        pomodoro(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("pomodoro"));
    }

    #[test]
    fn list_empty() {
        let temp = TempDir::new().unwrap();
        pomodoro(&temp)
            .args(["list", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[]"));
    }

    #[test]
    fn list_plain_names() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");
        write_cache_file(&temp, "blog--def.mocache", "blog");

        pomodoro(&temp)
            .args(["list", "--format", "plain"])
            .assert()
            .success()
            .stdout("blog--def.mocache\nshop--abc.mocache\n");
    }

    #[test]
    fn stats_counts_files() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");

        pomodoro(&temp)
            .args(["stats", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"files\": 1"));
    }

    #[test]
    fn lint_clean() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");

        pomodoro(&temp)
            .arg("lint")
            .assert()
            .success()
            .stdout(predicate::str::contains("1 file(s) ok"));
    }

    #[test]
    fn lint_broken_fails() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");
        fs::write(temp.path().join("cache").join("blog--bad.mocache"), "mtime = 1\n").unwrap();

        pomodoro(&temp)
            .arg("lint")
            .assert()
            .failure()
            .stdout(predicate::str::contains("blog--bad.mocache"))
            .stderr(predicate::str::contains("failed lint"));
    }

    #[test]
    fn prune_namespace() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");
        write_cache_file(&temp, "blog--def.mocache", "blog");

        pomodoro(&temp)
            .args(["prune", "--namespace", "shop", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Pruned 1 file(s)"));

        assert!(!temp.path().join("cache").join("shop--abc.mocache").exists());
        assert!(temp.path().join("cache").join("blog--def.mocache").exists());
    }

    #[test]
    fn prune_without_yes_aborts() {
        let temp = TempDir::new().unwrap();
        write_cache_file(&temp, "shop--abc.mocache", "shop");

        pomodoro(&temp)
            .arg("prune")
            .assert()
            .success()
            .stdout(predicate::str::contains("Aborted"));

        assert!(temp.path().join("cache").join("shop--abc.mocache").exists());
    }

    #[test]
    fn cache_dir_flag_beats_env() {
        let temp = TempDir::new().unwrap();
        let flag_dir = temp.path().join("cache").display().to_string();
        pomodoro(&temp)
            .env("POMODORO_CACHE_DIR", temp.path().join("from-env"))
            .args(["stats", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(flag_dir))
            .stdout(predicate::str::contains("from-env").not());
    }

    #[test]
    fn cache_dir_env_used_without_flag() {
        let temp = TempDir::new().unwrap();
        let mut cmd = cargo_bin_cmd!("pomodoro");
        cmd.env("POMODORO_CACHE_DIR", temp.path().join("from-env"))
            .env_remove("POMODORO_CONFIG")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .args(["stats", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("from-env"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        pomodoro(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        pomodoro(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"));
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("config.toml"), "[cache\n").unwrap();

        pomodoro(&temp)
            .arg("stats")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
