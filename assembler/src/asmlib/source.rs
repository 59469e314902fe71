//! Where things are in the original input.
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Line numbers count from 1.
pub(crate) type LineNumber = usize;

/// The position of a statement: the name of the input it came from
/// and its line number within that input.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Location {
    source: Arc<str>,
    line: LineNumber,
}

impl Location {
    pub(crate) fn new(source: &Arc<str>, line: LineNumber) -> Location {
        Location {
            source: Arc::clone(source),
            line,
        }
    }

    /// The name of the input (usually a file name).
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The line number, counting from 1.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct WithLocation<T> {
    pub(crate) inner: T,
    pub(crate) location: Location,
}

impl<T> WithLocation<T> {
    pub(crate) fn new(inner: T, location: Location) -> WithLocation<T> {
        WithLocation { inner, location }
    }
}

impl<T: Display> Display for WithLocation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", &self.location, &self.inner)
    }
}

#[test]
fn test_location_display() {
    let name: Arc<str> = Arc::from("blink.S");
    let loc = Location::new(&name, 12);
    assert_eq!(loc.to_string(), "blink.S:12");
    assert_eq!(loc.source(), "blink.S");
    assert_eq!(loc.line(), 12);
}
