//! Interactive part-number annotation.
//!
//! The editor walks the BOM rows with a cursor. Each answer is parsed into an
//! [`EditorCommand`]; [`step`] turns the current [`EditorState`] and a command
//! into the next state plus an optional write. Writes are persisted before the
//! next prompt so an interrupted session keeps every completed edit.
//!
//! | Answer | Command |
//! |---|---|
//! | `n` or empty | move to the next row |
//! | `b` | move back one row |
//! | `f` | move to the first row |
//! | `l` | move to the last row |
//! | `a` | abort |
//! | anything else | store it as the part number and advance |

use crate::assembly::bom::BomDocument;
use crate::assembly::error::{AssemblyError, AssemblyResult};
use crate::prompt::Prompt;

/// Cursor movement without writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// One row forward.
    Next,
    /// One row back.
    Back,
    /// First row.
    First,
    /// Last row.
    Last,
}

/// A parsed operator answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    /// Store a part number in the current row and advance.
    Annotate(String),
    /// Move the cursor.
    Move(Direction),
    /// Stop without further writes.
    Abort,
}

impl EditorCommand {
    /// Parses an answer. Single-letter commands are case-insensitive.
    #[must_use]
    pub fn parse(answer: &str) -> Self {
        let answer = answer.trim();
        match answer.to_lowercase().as_str() {
            "" | "n" => Self::Move(Direction::Next),
            "b" => Self::Move(Direction::Back),
            "f" => Self::Move(Direction::First),
            "l" => Self::Move(Direction::Last),
            "a" => Self::Abort,
            _ => Self::Annotate(answer.to_string()),
        }
    }
}

/// Editor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Waiting for an answer for the row at this index.
    Editing(usize),
    /// Cursor moved past the last row.
    Done,
    /// Operator aborted.
    Aborted,
}

impl EditorState {
    /// Initial state for a BOM with `line_count` rows.
    #[must_use]
    pub const fn start(line_count: usize) -> Self {
        if line_count == 0 {
            Self::Done
        } else {
            Self::Editing(0)
        }
    }

    const fn at(index: usize, line_count: usize) -> Self {
        if index >= line_count {
            Self::Done
        } else {
            Self::Editing(index)
        }
    }
}

/// A row update produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Row index.
    pub index: usize,
    /// New part number.
    pub part_number: String,
}

/// Applies `command` to `state` for a BOM with `line_count` rows.
///
/// Terminal states absorb every command.
#[must_use]
pub fn step(
    state: EditorState,
    command: EditorCommand,
    line_count: usize,
) -> (EditorState, Option<Edit>) {
    let EditorState::Editing(index) = state else {
        return (state, None);
    };

    match command {
        EditorCommand::Annotate(part_number) => (
            EditorState::at(index + 1, line_count),
            Some(Edit { index, part_number }),
        ),
        EditorCommand::Move(Direction::Next) => (EditorState::at(index + 1, line_count), None),
        EditorCommand::Move(Direction::Back) => {
            (EditorState::at(index.saturating_sub(1), line_count), None)
        }
        EditorCommand::Move(Direction::First) => (EditorState::at(0, line_count), None),
        EditorCommand::Move(Direction::Last) => (
            EditorState::at(line_count.saturating_sub(1), line_count),
            None,
        ),
        EditorCommand::Abort => (EditorState::Aborted, None),
    }
}

/// Drives the annotation session over a BOM.
pub struct Annotator<'a> {
    document: &'a mut BomDocument,
    state: EditorState,
}

impl<'a> Annotator<'a> {
    /// Creates an editor positioned on the first row.
    pub fn new(document: &'a mut BomDocument) -> Self {
        let state = EditorState::start(document.len());
        Self { document, state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> EditorState {
        self.state
    }

    /// Applies one command, calling `persist` after any write.
    ///
    /// # Errors
    ///
    /// Returns whatever `persist` returns.
    pub fn apply<F>(&mut self, command: EditorCommand, persist: &mut F) -> AssemblyResult<EditorState>
    where
        F: FnMut(&BomDocument) -> AssemblyResult<()>,
    {
        let (next, edit) = step(self.state, command, self.document.len());
        if let Some(edit) = edit {
            let line = &mut self.document.lines[edit.index];
            tracing::info!(designator = %line.designator, part = %edit.part_number, "Annotated BOM line");
            line.part_number = edit.part_number;
            persist(&*self.document)?;
        }
        self.state = next;
        Ok(next)
    }

    /// Prompts row by row until the cursor passes the last row.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::UserAborted`] on `a` or end of input, or
    /// whatever `persist` or the prompt returns.
    pub fn run<F>(&mut self, prompt: &mut dyn Prompt, mut persist: F) -> AssemblyResult<()>
    where
        F: FnMut(&BomDocument) -> AssemblyResult<()>,
    {
        let total = self.document.len();
        loop {
            let index = match self.state {
                EditorState::Editing(index) => index,
                EditorState::Done => return Ok(()),
                EditorState::Aborted => return Err(AssemblyError::UserAborted),
            };

            let line = &self.document.lines[index];
            let question = format!(
                "[{}/{total}] {} | {} | {} | part: '{}'\n\
                 Part number (n=next, b=back, f=first, l=last, a=abort): ",
                index + 1,
                line.comment,
                line.designator,
                line.footprint,
                line.part_number
            );
            let answer = prompt
                .ask(&question)
                .map_err(|source| AssemblyError::Prompt { source })?
                .ok_or(AssemblyError::UserAborted)?;

            self.apply(EditorCommand::parse(&answer), &mut persist)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::bom::BomLine;
    use crate::prompt::ScriptedPrompt;

    fn document(rows: usize) -> BomDocument {
        BomDocument {
            header: BomLine::new("Comment", "Designator", "Footprint", "LCSC Part #"),
            lines: (1..=rows)
                .map(|i| BomLine::new("10k", format!("R{i}"), "0402", ""))
                .collect(),
        }
    }

    #[test]
    fn parse_commands() {
        assert_eq!(EditorCommand::parse("n"), EditorCommand::Move(Direction::Next));
        assert_eq!(EditorCommand::parse(""), EditorCommand::Move(Direction::Next));
        assert_eq!(EditorCommand::parse("B"), EditorCommand::Move(Direction::Back));
        assert_eq!(EditorCommand::parse("f"), EditorCommand::Move(Direction::First));
        assert_eq!(EditorCommand::parse("l"), EditorCommand::Move(Direction::Last));
        assert_eq!(EditorCommand::parse("a"), EditorCommand::Abort);
        assert_eq!(
            EditorCommand::parse(" C25744 "),
            EditorCommand::Annotate("C25744".into())
        );
    }

    #[test]
    fn transitions() {
        let s = EditorState::Editing(1);
        assert_eq!(
            step(s, EditorCommand::Annotate("C1".into()), 3),
            (
                EditorState::Editing(2),
                Some(Edit {
                    index: 1,
                    part_number: "C1".into()
                })
            )
        );
        assert_eq!(
            step(s, EditorCommand::Move(Direction::Back), 3).0,
            EditorState::Editing(0)
        );
        assert_eq!(
            step(EditorState::Editing(0), EditorCommand::Move(Direction::Back), 3).0,
            EditorState::Editing(0)
        );
        assert_eq!(
            step(s, EditorCommand::Move(Direction::Last), 3).0,
            EditorState::Editing(2)
        );
        assert_eq!(
            step(EditorState::Editing(2), EditorCommand::Move(Direction::Next), 3).0,
            EditorState::Done
        );
        assert_eq!(step(s, EditorCommand::Abort, 3).0, EditorState::Aborted);
        assert_eq!(
            step(EditorState::Done, EditorCommand::Annotate("C1".into()), 3),
            (EditorState::Done, None)
        );
    }

    #[test]
    fn empty_bom_is_done_immediately() {
        assert_eq!(EditorState::start(0), EditorState::Done);
    }

    #[test]
    fn every_write_is_persisted() {
        let mut doc = document(3);
        let mut prompt = ScriptedPrompt::new(["C1", "b", "C1b", "n", "C3"]);
        let mut saves = Vec::new();

        Annotator::new(&mut doc)
            .run(&mut prompt, |d| {
                saves.push(d.lines.iter().map(|l| l.part_number.clone()).collect::<Vec<_>>());
                Ok(())
            })
            .unwrap();

        assert_eq!(saves.len(), 3);
        assert_eq!(saves[0], vec!["C1", "", ""]);
        assert_eq!(saves[1], vec!["C1b", "", ""]);
        assert_eq!(saves[2], vec!["C1b", "", "C3"]);
        assert_eq!(doc.lines[2].part_number, "C3");
    }

    #[test]
    fn abort_stops_without_writing() {
        let mut doc = document(2);
        let mut prompt = ScriptedPrompt::new(["C1", "a", "C2"]);
        let mut writes = 0;

        let result = Annotator::new(&mut doc).run(&mut prompt, |_| {
            writes += 1;
            Ok(())
        });

        assert!(matches!(result, Err(AssemblyError::UserAborted)));
        assert_eq!(writes, 1);
        assert_eq!(doc.lines[1].part_number, "");
    }

    #[test]
    fn end_of_input_counts_as_abort() {
        let mut doc = document(2);
        let mut prompt = ScriptedPrompt::new(["C1"]);
        let result = Annotator::new(&mut doc).run(&mut prompt, |_| Ok(()));
        assert!(matches!(result, Err(AssemblyError::UserAborted)));
    }
}
