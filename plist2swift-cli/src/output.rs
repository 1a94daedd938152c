use std::{
    fs,
    io::{self, Write},
    path::Path,
};

/// Write generated text to `output`, or to stdout when no path is given.
///
/// An existing file is truncated and overwritten.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<(), String> {
    match output {
        Some(path) => fs::write(path, text)
            .map_err(|e| format!("Cannot write output file {}: {}", path.display(), e)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(|e| format!("Cannot write to stdout: {}", e))
        }
    }
}
