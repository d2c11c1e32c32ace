//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of ZiChain.
//! The ZiChain project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::log::core::ZcLogRecord;
use crate::log::formatters::format;

pub trait ZcLogHandler {
    fn handle(&self, record: &ZcLogRecord);

    fn flush(&self) {}
}

pub struct ZcStdoutHandler {
    json: bool,
}

impl ZcStdoutHandler {
    pub fn new(json: bool) -> Self {
        ZcStdoutHandler { json }
    }
}

impl ZcLogHandler for ZcStdoutHandler {
    fn handle(&self, record: &ZcLogRecord) {
        println!("{}", format(record, self.json));
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

pub struct ZcStderrHandler {
    json: bool,
}

impl ZcStderrHandler {
    pub fn new(json: bool) -> Self {
        ZcStderrHandler { json }
    }
}

impl ZcLogHandler for ZcStderrHandler {
    fn handle(&self, record: &ZcLogRecord) {
        eprintln!("{}", format(record, self.json));
    }
}

/// Appends to a file, rotating `path` -> `path.1` -> `path.2` by size.
pub struct ZcFileHandler {
    path: PathBuf,
    json: bool,
    max_bytes: Option<u64>,
    backup_count: u32,
    lock: Mutex<()>,
}

impl ZcFileHandler {
    pub fn new(path: String, json: bool, max_bytes: Option<u64>, backup_count: Option<u32>) -> Self {
        ZcFileHandler {
            path: PathBuf::from(path),
            json,
            max_bytes,
            backup_count: backup_count.unwrap_or(7),
            lock: Mutex::new(()),
        }
    }

    fn backup(&self, index: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        let max_bytes = match self.max_bytes {
            Some(v) => v,
            None => return,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > max_bytes => {}
            _ => return,
        }
        if self.backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }
        for index in (1..self.backup_count).rev() {
            let from = self.backup(index);
            if from.exists() {
                let _ = fs::rename(&from, self.backup(index + 1));
            }
        }
        let _ = fs::rename(&self.path, self.backup(1));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ZcLogHandler for ZcFileHandler {
    fn handle(&self, record: &ZcLogRecord) {
        let _guard = match self.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.rotate_if_needed();

        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{}", format(record, self.json));
        }
    }
}
