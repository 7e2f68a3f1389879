use std::{fmt, num::NonZeroU32, num::ParseIntError, str::FromStr};

/// Size of the name buffer the roster format was designed around; one slot
/// is reserved for the terminator, so names keep at most 49 characters.
pub const NAME_CAPACITY: usize = 50;

/// Positive student ID, anywhere in `1..=u32::MAX`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StudentId(NonZeroU32);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentName(String);

/// One roster record, borrowed from the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Student<'a> {
    pub id: StudentId,
    pub name: &'a StudentName,
}

impl StudentId {
    pub fn new(id: u32) -> Option<Self> { NonZeroU32::new(id).map(Self) }
    pub fn get(self) -> u32 { self.0.get() }
}

impl FromStr for StudentId {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, ParseIntError> { s.parse().map(Self) }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StudentName {
    /// Keeps the first `NAME_CAPACITY - 1` characters of `name`.
    pub fn new(name: &str) -> Self {
        let end = name
            .char_indices()
            .nth(NAME_CAPACITY - 1)
            .map_or(name.len(), |(i, _)| i);
        Self(name[..end].to_owned())
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<&str> for StudentName {
    fn from(name: &str) -> Self { Self::new(name) }
}

impl fmt::Display for StudentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Student<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student ID: {}, Name: {}", self.id, self.name)
    }
}
