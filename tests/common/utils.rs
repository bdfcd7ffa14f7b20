#![allow(dead_code)]

use std::path::{Path, PathBuf};

use learning_dashboard::reporter::events::{RawStatus, TestIdentity, TestResultInfo};
use serde_json::{Value, json};

pub fn identity(title: &str, file: &str, project: &str) -> TestIdentity {
    TestIdentity::new(title).with_file(file).with_project(project)
}

pub fn result(status: RawStatus, duration_ms: f64) -> TestResultInfo {
    TestResultInfo::new(status).with_duration(duration_ms)
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

pub fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

/// A small engine results tree: two files, two projects, one retry.
pub fn sample_results() -> Value {
    json!({
        "config": {},
        "suites": [
            {
                "title": "login.spec.js",
                "file": "login.spec.js",
                "specs": [
                    {
                        "title": "shows form",
                        "file": "login.spec.js",
                        "tests": [
                            { "projectName": "chromium", "results": [
                                { "status": "passed", "duration": 120, "retry": 0, "errors": [] }
                            ]},
                            { "projectName": "firefox", "results": [
                                { "status": "passed", "duration": 180, "retry": 0, "errors": [] }
                            ]}
                        ]
                    }
                ],
                "suites": [
                    {
                        "title": "submit",
                        "file": "login.spec.js",
                        "specs": [
                            {
                                "title": "rejects bad password",
                                "file": "login.spec.js",
                                "tests": [
                                    { "projectName": "chromium", "results": [
                                        { "status": "failed", "duration": 300, "retry": 0,
                                          "error": { "message": "Error: expected 401\n    at login.spec.js:12" },
                                          "errors": [{ "message": "Error: expected 401" }] },
                                        { "status": "timedOut", "duration": 5000, "retry": 1, "errors": [] }
                                    ]}
                                ]
                            }
                        ]
                    }
                ]
            },
            {
                "title": "table.spec.js",
                "file": "table.spec.js",
                "specs": [
                    {
                        "title": "sorts rows",
                        "file": "table.spec.js",
                        "tests": [
                            { "projectName": "chromium", "results": [
                                { "status": "skipped", "duration": 0, "retry": 0, "errors": [] }
                            ]}
                        ]
                    }
                ]
            }
        ],
        "stats": { "startTime": "2026-01-01T00:00:00.000Z", "duration": 6123.4 }
    })
}
