//! JSON files for recorded timelines.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use crate::TimeMachine;

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

impl<State: Serialize> TimeMachine<State> {
    pub fn save_json_file(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut writer = io::BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer(&mut writer, self)
            .map_err(|e| invalid(format!("failed encoding timeline {}: {e}", path.display())))?;
        writer.flush()
    }
}

impl<State: DeserializeOwned> TimeMachine<State> {
    pub fn load_json_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let reader = io::BufReader::new(fs::File::open(path)?);
        let tm: Self = serde_json::from_reader(reader)
            .map_err(|e| invalid(format!("failed parsing timeline {}: {e}", path.display())))?;
        // a decoded timeline must hold at least one state and point inside itself
        if tm.frame() >= tm.len() {
            return Err(invalid(format!(
                "timeline {} has frame {} outside {} states",
                path.display(),
                tm.frame(),
                tm.len()
            )));
        }
        Ok(tm)
    }
}
