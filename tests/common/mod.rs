#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    /// Tree of code and ABOUT files.
    pub tree: PathBuf,
    /// Empty scratch directory for outputs.
    pub out: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");
        let out = tmp.path().join("out");
        fs::create_dir_all(&out).expect("create output dir");
        let tree = make_fixture_tree(tmp.path());

        Self {
            _tmp: tmp,
            home,
            tree,
            out,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("about");
        cmd.env("HOME", &self.home)
            .env_remove("ABOUT_CONFIG")
            .env_remove("ABOUT_LOG");
        cmd
    }

    pub fn out_path(&self, name: &str) -> PathBuf {
        self.out.join(name)
    }

    pub fn write_config(&self, raw: &str) {
        let path = self.home.join(".config/about/config.toml");
        fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
        fs::write(path, raw).expect("write config");
    }

    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
    }
}

/// Two components: `zlib` (redistributable, with a license file) and an
/// internal `tool` missing its notice file.
fn make_fixture_tree(base: &Path) -> PathBuf {
    let tree = base.join("tree");
    let zlib = tree.join("thirdparty/zlib");
    let tool = tree.join("internal");
    fs::create_dir_all(zlib.join("src")).expect("create zlib dir");
    fs::create_dir_all(&tool).expect("create tool dir");

    fs::write(zlib.join("src/inflate.c"), "int inflate(void);\n").expect("write source");
    fs::write(zlib.join("zlib.LICENSE"), "zlib license: use freely\n").expect("write license");
    fs::write(
        zlib.join("zlib.ABOUT"),
        "about_resource: src\n\
         name: zlib\n\
         version: 1.2.13\n\
         copyright: Copyright (c) Jean-loup Gailly and Mark Adler\n\
         license_expression: zlib\n\
         redistribute: yes\n\
         licenses:\n\
         \x20 - key: zlib\n\
         \x20   name: ZLIB License\n\
         \x20   file: zlib.LICENSE\n",
    )
    .expect("write zlib ABOUT");

    fs::write(tool.join("tool.py"), "print('hi')\n").expect("write tool");
    fs::write(
        tool.join("tool.py.ABOUT"),
        "about_resource: tool.py\n\
         name: tool\n\
         notice_file: NOTICE\n\
         owner_team: platform\n",
    )
    .expect("write tool ABOUT");

    tree
}
