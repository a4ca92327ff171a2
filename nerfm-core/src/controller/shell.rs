//! ``src/controller/shell.rs``
//! ============================================================================
//! # `Shell`: Read-Eval-Print Loop
//!
//! Drives a [`Session`] from any line source: render, prompt, read, execute,
//! print. A failing command is printed and logged and the loop goes on; end
//! of input behaves like `exit`.

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::controller::session::Session;
use crate::fs::file_system::FileSystem;
use crate::view::listing::SEPARATOR;

pub const PROMPT: &str = "Enter a command: ";

pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run<F: FileSystem>(&mut self, session: &mut Session<F>) -> io::Result<()> {
        let mut line = String::new();

        loop {
            match session.render() {
                Ok(lines) => self.print(&lines)?,
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "Listing failed");
                    writeln!(self.output, "Error: {e}")?;
                }
            }

            write!(self.output, "\n{PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                info!("End of input");
                writeln!(self.output)?;
                match session.shutdown() {
                    Ok(lines) => self.print(&lines)?,
                    Err(e) => {
                        warn!(kind = e.kind(), error = %e, "Shutdown failed");
                        writeln!(self.output, "Error: {e}")?;
                    }
                }
                break;
            }

            writeln!(self.output)?;
            if line.trim().is_empty() {
                continue;
            }

            match session.execute_line(&line) {
                Ok(reply) => {
                    self.print(&reply.lines)?;
                    if reply.exit {
                        break;
                    }
                }
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, input = line.trim(), "Command failed");
                    writeln!(self.output, "Error: {e}")?;
                }
            }

            writeln!(self.output, "\n{SEPARATOR}\n")?;
        }

        self.output.flush()
    }

    fn print(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::file_system::LocalFileSystem;
    use crate::model::annotation_store::AnnotationStore;
    use clipr::ClipboardConfig;
    use std::fs;
    use tempfile::TempDir;

    fn run_script(script: &str) -> (TempDir, String) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("only.txt"), "content").unwrap();

        let mut session = Session::new(
            LocalFileSystem,
            root,
            AnnotationStore::new(temp_dir.path().join("annotations.json")),
            ClipboardConfig::default(),
        );
        let mut shell = Shell::new(script.as_bytes(), Vec::new());
        shell.run(&mut session).unwrap();
        let output = String::from_utf8(shell.into_output()).unwrap();
        (temp_dir, output)
    }

    #[test]
    fn errors_are_printed_and_the_loop_continues() {
        let (_temp_dir, output) = run_script("7\n1\nexit\n");
        assert!(output.contains("Error: Invalid reference 7"));
        assert!(output.contains("content"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn end_of_input_discards_a_pending_cut() {
        let (temp_dir, output) = run_script("1 cut\n");
        assert!(!temp_dir.path().join("root/only.txt").exists());
        assert!(output.contains("Pending cut"));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let (_temp_dir, output) = run_script("\n\nhelp\nexit\n");
        assert!(!output.contains("Error"));
        assert!(output.contains("exit : "));
    }
}
