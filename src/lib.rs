mod error;
pub mod fields;
pub mod hwpx;
pub mod layout;
pub mod model;
pub mod reflow;
pub mod section;
pub mod substitute;
pub mod tree;
pub mod xml;

pub use error::Error;
pub use fields::{Field, Fields};
pub use layout::LayoutConstants;
pub use substitute::Replacement;

use std::path::Path;

pub fn read_fields(input: &Path) -> Result<Fields, Error> {
    let entries = hwpx::read_package(std::fs::File::open(input)?)?;
    hwpx::extract_fields(&entries)
}

/// Applies `edits` to the template at `input` and writes the result to
/// `output`. Returns the field values that were written.
pub fn fill_hwpx(
    input: &Path,
    output: &Path,
    edits: &[(Field, String)],
    constants: &LayoutConstants,
) -> Result<Fields, Error> {
    let mut entries = hwpx::read_package(std::fs::File::open(input)?)?;
    let original = hwpx::extract_fields(&entries)?;

    let mut edited = original.clone();
    for (field, value) in edits {
        if !field.is_editable() {
            return Err(Error::UnknownField(field.key().to_string()));
        }
        edited.edit(*field, value);
    }
    let edited = edited.finalized(&fields::today_kst());

    let replacements = fields::replacements(&original, &edited);
    hwpx::fill_package(&mut entries, &replacements, constants)?;
    hwpx::write_package(std::fs::File::create(output)?, &entries)?;
    Ok(edited)
}
