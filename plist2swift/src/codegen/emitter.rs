use std::fmt::Display;

/// Accumulates generated source text, tracking the current indentation depth.
///
/// Lines are indented with one tab per level.
#[derive(Debug, Default)]
pub struct Emitter {
    out: String,
    depth: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl Display) {
        let text = text.to_string();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.out.push('\t');
            }
            self.out.push_str(&text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    /// Writes `header {` and indents what follows.
    pub fn open(&mut self, header: impl Display) {
        self.line(format_args!("{} {{", header));
        self.depth += 1;
    }

    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    /// Writes pre-formatted lines verbatim, one per line, at the current depth.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// Returns the text, ending in exactly one newline.
    pub fn finish(self) -> String {
        let mut out = self.out;
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}
