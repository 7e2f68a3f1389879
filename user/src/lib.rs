use std::io::{self, BufRead, Write};

use avl_map::AvlMap;
use input::{InputError, Prompter};
use thiserror::Error;
use tracing::{debug, info, Level, Subscriber};
use tracing_subscriber::{fmt::MakeWriter, EnvFilter, FmtSubscriber};

mod student;

pub use student::{Student, StudentId, StudentName, NAME_CAPACITY};

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Error reading name")]
    Name(#[source] InputError),
    #[error(transparent)]
    Input(#[from] InputError),
}

/// Students keyed by ID. The first name admitted under an ID is kept.
#[derive(Debug, Default)]
pub struct Roster {
    students: AvlMap<StudentId, StudentName>,
}

impl Roster {
    pub fn new() -> Self { Self { students: AvlMap::new() } }

    pub fn admit(&mut self, id: StudentId, name: StudentName) -> bool {
        let admitted = self.students.insert(id, name);
        if admitted {
            debug!(%id, "student admitted");
        } else {
            debug!(%id, "duplicate student ID ignored");
        }
        admitted
    }

    pub fn len(&self) -> usize { self.students.len() }
    pub fn is_empty(&self) -> bool { self.students.is_empty() }
    pub fn height(&self) -> usize { self.students.height() }

    /// Students in ascending ID order.
    pub fn students(&self) -> impl Iterator<Item = Student<'_>> + '_ {
        self.students.iter().map(|(&id, name)| Student { id, name })
    }
}

/// Asks for a student count and then for that many IDs and names,
/// admitting each student as soon as it is read. Returns the count.
pub fn populate<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    roster: &mut Roster,
) -> Result<usize, RosterError> {
    let n = prompter.prompt_parse::<usize, _>(
        "Enter the number of students: ",
        "Please enter a valid positive number of students: ",
        |&n| n > 0,
    )?;

    for _ in 0..n {
        let id = prompter.prompt_parse::<StudentId, _>(
            "Enter student ID: ",
            "Please enter a valid positive student ID: ",
            |_| true,
        )?;
        let name = prompter
            .prompt_line("Enter student name: ")
            .map_err(RosterError::Name)?;
        roster.admit(id, StudentName::new(&name));
    }

    info!(read = n, stored = roster.len(), "roster populated");
    Ok(n)
}

/// Warnings only, unless `verbose`; a normal session writes nothing to
/// stderr.
pub fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    EnvFilter::new(level.to_string())
}

pub fn log_subscriber<W>(
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .finish()
}

pub fn render<W: Write>(roster: &Roster, mut writer: W) -> io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "Inorder Traversal of AVL Tree:")?;
    for student in roster.students() {
        writeln!(writer, "{student}")?;
    }
    writer.flush()
}
