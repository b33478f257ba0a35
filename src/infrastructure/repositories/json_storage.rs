use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// Save to JSON; written next to the target and renamed over it
pub fn save_json<T: Serialize>(value: &T, file_path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let mut tmp_name = file_path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, file_path)
}

// Load from JSON; a missing file yields the default value
pub fn load_json<T: DeserializeOwned + Default>(file_path: &Path) -> io::Result<T> {
    if !file_path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(file_path)?;
    let value: T = serde_json::from_str(&data)?;
    Ok(value)
}
