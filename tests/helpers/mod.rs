//! Shared fixture support: builds MATLAB source trees in temp dirs.
#![allow(dead_code)] // each test binary uses a different subset

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tempfile::TempDir;

use matpath::Workspace;

/// A disposable source tree rooted in a temp directory.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create fixture dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().expect("fixture paths have parents"))
            .expect("create fixture parents");
        fs::write(path, content).expect("write fixture file");
        self
    }

    /// Build a workspace over the given roots (relative to the fixture),
    /// in order.
    pub fn workspace(&self, roots: &[&str]) -> Workspace {
        let mut ws = Workspace::new();
        for root in roots {
            ws.add_path(self.path(root));
        }
        ws.build().expect("workspace build");
        ws
    }
}

/// A family of numbered plain classes, `class0` through `class9`, used by
/// the exact-name-matching tests. Generated once.
pub static NUMBERED_CLASSES: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    (0..10)
        .map(|i| {
            (
                format!("class{i}.m"),
                format!("classdef class{i}\nproperties\nindex{i}\nend\nend\n"),
            )
        })
        .collect()
});

pub fn function_source(name: &str) -> String {
    format!("function out = {name}(x)\nout = x;\nend\n")
}

pub fn classdef_source(name: &str, supers: &[&str], props: &[&str]) -> String {
    let mut src = String::from("classdef ");
    src.push_str(name);
    if !supers.is_empty() {
        src.push_str(" < ");
        src.push_str(&supers.join(" & "));
    }
    src.push('\n');
    if !props.is_empty() {
        src.push_str("properties\n");
        for prop in props {
            src.push_str(prop);
            src.push('\n');
        }
        src.push_str("end\n");
    }
    src.push_str("end\n");
    src
}
