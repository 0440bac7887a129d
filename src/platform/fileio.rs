use std::path::Path;

use tracing::info;

/// Loads a file from the content directory and returns it as a string.
/// `file_path` should be relative to the content\ directory.
pub fn load_as_string<P>(file_path: P) -> anyhow::Result<String>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    info!("load file as string: {file_path:?}");

    // TODO: This is going to break horribly when redistributing the demo!
    let full_path = Path::new(env!("OUT_DIR")).join("content").join(file_path);
    Ok(std::fs::read_to_string(full_path)?)
}

/// Loads a file from the content directory and returns it as a vector of
/// bytes. `file_path` should be relative to the content\ directory.
pub fn load_as_binary<P>(file_path: P) -> anyhow::Result<Vec<u8>>
where
    P: AsRef<Path> + std::fmt::Debug,
{
    info!("load file as binary: {file_path:?}");

    // TODO: This is going to break horribly when redistributing the demo!
    let full_path = Path::new(env!("OUT_DIR")).join("content").join(file_path);
    Ok(std::fs::read(full_path)?)
}
