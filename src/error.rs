use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The archive opened but is not a usable template: no
    /// `Contents/section*.xml` entry, or a section that is not UTF-8.
    InvalidHwpx(String),
    /// A field name that does not exist, or names a field the fill cannot
    /// change (company details, representative).
    UnknownField(String),
    Zip(zip::result::ZipError),
    Xml(roxmltree::Error),
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidHwpx(reason) => write!(f, "template cannot be filled: {reason}"),
            Error::UnknownField(name) => {
                write!(f, "field '{name}' is unknown or cannot be edited")
            }
            Error::Zip(e) => write!(f, "HWPX archive error: {e}"),
            Error::Xml(e) => write!(f, "section XML error: {e}"),
            Error::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Error::Zip(e)
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Error::Xml(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
