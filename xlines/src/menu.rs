//! Interactive exclusion editing (`xlines configure`).
//!
//! The menu is a small state machine. Every state reads from a `BufRead` and
//! writes to a `Write`, so the whole flow can be driven from a script.
//! End of input behaves like an empty answer.

use std::io::{self, BufRead, Write};

use xlineslib::{ExclusionFile, ExclusionList, XlinesError};

use crate::render::{self, MessageKind};

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    AddFlow,
    RemoveFlow,
    ThresholdFlow,
    Quit,
}

pub struct Menu<'a> {
    file: &'a ExclusionFile,
    list: ExclusionList,
}

impl<'a> Menu<'a> {
    pub fn new(file: &'a ExclusionFile) -> Self {
        Self {
            file,
            list: file.load_or_empty(),
        }
    }

    pub fn exclusions(&self) -> &ExclusionList {
        &self.list
    }

    /// Run until the user quits or input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, out: &mut W) -> io::Result<()> {
        let mut state = MenuState::MainMenu;
        while state != MenuState::Quit {
            state = self.step(state, input, out)?;
        }
        Ok(())
    }

    fn step<R: BufRead, W: Write>(
        &mut self,
        state: MenuState,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<MenuState> {
        match state {
            MenuState::MainMenu => self.main_menu(input, out),
            MenuState::AddFlow => self.add_flow(input, out),
            MenuState::RemoveFlow => self.remove_flow(input, out),
            MenuState::ThresholdFlow => threshold_flow(out),
            MenuState::Quit => Ok(MenuState::Quit),
        }
    }

    fn main_menu<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<MenuState> {
        let rule = "_".repeat(RULE_WIDTH);
        writeln!(out, "\n    {rule}\n")?;
        writeln!(out, "        {} configuration main menu:\n", render::title("xlines"))?;
        writeln!(out, "              a)  Add file type to exclusion list\n")?;
        writeln!(out, "              b)  Remove file type from exclusion list\n")?;
        writeln!(
            out,
            "              c)  Set high line count threshold ({} file objects)\n",
            render::accent("highlight")
        )?;
        writeln!(out, "              d)  quit")?;
        writeln!(out, "    {rule}\n")?;

        loop {
            let answer = prompt(input, out, "        Choose operation [quit]: ")?.to_lowercase();
            match answer.as_str() {
                "" | "d" => return Ok(MenuState::Quit),
                "a" => return Ok(MenuState::AddFlow),
                "b" => return Ok(MenuState::RemoveFlow),
                "c" => return Ok(MenuState::ThresholdFlow),
                _ => render::write_message(
                    out,
                    MessageKind::Info,
                    "You must provide a letter a, b, c, or d",
                )?,
            }
        }
    }

    fn add_flow<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<MenuState> {
        render::write_exclusions(out, &self.list)?;

        let response = prompt(
            input,
            out,
            "  Enter file extension types to be excluded separated by commas [quit]: ",
        )?;
        if response.is_empty() {
            return Ok(MenuState::MainMenu);
        }

        match self.file.add(&mut self.list, response.split(',')) {
            Ok(added) => {
                tracing::info!(?added, "exclusions updated");
                render::write_exclusions(out, &self.list)?;
            }
            Err(e) => self.warn_unmodified(out, &e)?,
        }
        Ok(MenuState::MainMenu)
    }

    fn remove_flow<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<MenuState> {
        render::write_exclusions(out, &self.list)?;
        if self.list.is_empty() {
            render::write_message(out, MessageKind::Info, "Nothing to remove")?;
            return Ok(MenuState::MainMenu);
        }

        loop {
            let answer = prompt(input, out, "        Pick a number to remove [none]: ")?;
            if answer.is_empty() {
                return Ok(MenuState::MainMenu);
            }

            // Unparseable input gets the same treatment as an out-of-range index.
            let index = answer.parse::<usize>().unwrap_or(0);
            match self.file.remove(&mut self.list, index) {
                Ok(removed) => {
                    render::write_exclusions(out, &self.list)?;
                    render::write_message(
                        out,
                        MessageKind::Ok,
                        &format!("Successfully removed file type exclusion: {removed}"),
                    )?;
                    return Ok(MenuState::MainMenu);
                }
                Err(XlinesError::IndexOutOfRange { len, .. }) => {
                    render::write_message(
                        out,
                        MessageKind::Warn,
                        &format!("You must pick a number between 1 and {len}"),
                    )?;
                }
                Err(e @ XlinesError::RemovalNotPersisted { .. }) => {
                    render::write_message(out, MessageKind::Fail, &e.to_string())?;
                    return Ok(MenuState::MainMenu);
                }
                Err(e) => {
                    self.warn_unmodified(out, &e)?;
                    return Ok(MenuState::MainMenu);
                }
            }
        }
    }

    fn warn_unmodified<W: Write>(&self, out: &mut W, err: &XlinesError) -> io::Result<()> {
        tracing::debug!("exclusion update failed: {err}");
        render::write_message(
            out,
            MessageKind::Warn,
            &format!(
                "Unable to modify local config file located at {}",
                self.file.path().display()
            ),
        )
    }
}

fn threshold_flow<W: Write>(out: &mut W) -> io::Result<MenuState> {
    render::write_message(
        out,
        MessageKind::Info,
        "The high line count threshold is not stored yet; pass --threshold <N> when counting",
    )?;
    Ok(MenuState::MainMenu)
}

/// Print `question`, read one line, return it trimmed. End of input reads as
/// an empty answer.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> io::Result<String> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    writeln!(out)?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::tempdir;

    fn exclusion_file(dir: &Path, contents: &str) -> ExclusionFile {
        let path = dir.join("exclusions.list");
        fs::write(&path, contents).unwrap();
        ExclusionFile::new(path)
    }

    fn drive(file: &ExclusionFile, script: &str) -> (ExclusionList, String) {
        let mut menu = Menu::new(file);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        menu.run(&mut input, &mut out).unwrap();
        (menu.exclusions().clone(), String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_answer_quits() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".a\n");

        let (list, out) = drive(&file, "\n");
        assert!(out.contains("configuration main menu"));
        assert_eq!(list.tokens(), &[".a"]);
    }

    #[test]
    fn test_end_of_input_quits() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), "");
        let (list, _) = drive(&file, "");
        assert!(list.is_empty());
    }

    #[test]
    fn test_unknown_letter_reprompts() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), "");

        let (_, out) = drive(&file, "x\nd\n");
        assert!(out.contains("You must provide a letter a, b, c, or d"));
    }

    #[test]
    fn test_add_flow_persists() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".lock\n");

        let (list, out) = drive(&file, "a\nfoo, .bar\n\n");

        assert_eq!(list.tokens(), &[".lock", ".foo", ".bar"]);
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            ".lock\n.foo\n.bar\n"
        );
        assert!(out.contains(".foo"));
    }

    #[test]
    fn test_add_flow_empty_answer_changes_nothing() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".lock\n");

        drive(&file, "a\n\n\n");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), ".lock\n");
    }

    #[test]
    fn test_remove_flow_reprompts_on_bad_index() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".a\n.b\n");

        let (list, out) = drive(&file, "b\n7\nzero\n1\n\n");

        assert!(out.contains("You must pick a number between 1 and 2"));
        assert!(out.contains("Successfully removed file type exclusion: .a"));
        assert_eq!(list.tokens(), &[".b"]);
        assert_eq!(fs::read_to_string(file.path()).unwrap(), ".b\n");
    }

    #[test]
    fn test_remove_flow_empty_answer_keeps_file() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".a\n");

        drive(&file, "b\n\n\n");
        assert_eq!(fs::read_to_string(file.path()).unwrap(), ".a\n");
    }

    #[test]
    fn test_remove_flow_with_empty_list() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), "");

        let (_, out) = drive(&file, "b\n\n");
        assert!(out.contains("Nothing to remove"));
    }

    #[test]
    fn test_threshold_flow_is_informational() {
        let temp = tempdir().unwrap();
        let file = exclusion_file(temp.path(), ".a\n");

        let (_, out) = drive(&file, "c\nd\n");
        assert!(out.contains("--threshold"));
        assert_eq!(fs::read_to_string(file.path()).unwrap(), ".a\n");
    }

    #[test]
    fn test_add_flow_reports_persist_failure() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("exclusions.list");
        fs::create_dir(&path).unwrap();
        let file = ExclusionFile::new(&path);

        let (_, out) = drive(&file, "a\nfoo\n\n");
        assert!(out.contains("Unable to modify local config file"));
    }
}
