use core::fmt;
use std::{borrow::Cow, ops::Deref};

/// An error that can occur while allocating list numbering.
#[derive(Clone)]
pub struct Error(Box<Repr>);

#[derive(Clone)]
enum Repr {
    /// Just a message.
    Msg(Cow<'static, str>),
    /// The numbering part could not be parsed.
    Xml(String),
    /// An `end_list` without a matching `begin_list`.
    Unbalanced { depth: usize, stack: usize },
}

impl Error {
    pub(crate) fn invalid_xml(msg: impl Into<String>) -> Self {
        Error(Box::new(Repr::Xml(msg.into())))
    }

    pub(crate) fn unbalanced(depth: usize, stack: usize) -> Self {
        Error(Box::new(Repr::Unbalanced { depth, stack }))
    }

    /// Whether the error was caused by an unbalanced list nesting.
    pub fn is_unbalanced(&self) -> bool {
        matches!(self.0.deref(), Repr::Unbalanced { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::Msg(s) => write!(f, "{s}"),
            Repr::Xml(s) => write!(f, "invalid numbering part: {s}"),
            Repr::Unbalanced { depth, stack } => write!(
                f,
                "unbalanced list nesting: end of list at depth {depth} with {stack} open contexts"
            ),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error(Box::new(Repr::Xml(e.to_string())))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<Cow<'static, str>> for Error {
    fn from(s: Cow<'static, str>) -> Self {
        Error(Box::new(Repr::Msg(s)))
    }
}
