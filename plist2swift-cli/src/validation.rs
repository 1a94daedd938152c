use std::path::Path;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate the output file can be created without touching the filesystem.
///
/// The parent directory must already exist; nothing is created before generation succeeds.
pub fn validate_output_path(path: &Path) -> Result<(), String> {
    if path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => Err(format!(
            "Output directory does not exist: {}",
            parent.display()
        )),
        _ => Ok(()),
    }
}

/// Validate every input file, then the output path if one was given.
pub fn validate_paths<P: AsRef<Path>>(inputs: &[P], output: Option<&Path>) -> Result<(), String> {
    for input in inputs {
        validate_file_path(input.as_ref())?;
    }

    if let Some(output) = output {
        validate_output_path(output)?;
    }

    Ok(())
}
