//! Per-kind field schemas.

use super::kind::DatasetKind;

const SECTION_NUMERIC: &[&str] = &["avg", "pass", "fail", "audit", "year"];
const SECTION_STRING: &[&str] = &["dept", "id", "instructor", "title", "uuid"];

const ROOM_NUMERIC: &[&str] = &["lat", "lon", "seats"];
const ROOM_STRING: &[&str] = &[
    "fullname",
    "shortname",
    "number",
    "name",
    "address",
    "type",
    "furniture",
    "href",
];

/// Value class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    Numeric,
    String,
}

/// The numeric and string fields of one dataset kind.
///
/// The two sets are disjoint and together cover every field of the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    kind: DatasetKind,
    numeric: &'static [&'static str],
    string: &'static [&'static str],
}

impl FieldSchema {
    /// The kind this schema describes.
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Numeric field names.
    pub fn numeric_fields(&self) -> &'static [&'static str] {
        self.numeric
    }

    /// String field names.
    pub fn string_fields(&self) -> &'static [&'static str] {
        self.string
    }

    /// Check if `field` is a numeric field.
    pub fn is_numeric(&self, field: &str) -> bool {
        self.numeric.contains(&field)
    }

    /// Check if `field` is a string field.
    pub fn is_string(&self, field: &str) -> bool {
        self.string.contains(&field)
    }

    /// Class of `field`, or `None` if the kind has no such field.
    pub fn class_of(&self, field: &str) -> Option<FieldClass> {
        if self.is_numeric(field) {
            Some(FieldClass::Numeric)
        } else if self.is_string(field) {
            Some(FieldClass::String)
        } else {
            None
        }
    }

    /// Check if `field` belongs to this schema at all.
    pub fn contains(&self, field: &str) -> bool {
        self.class_of(field).is_some()
    }

    /// Iterate over every field name, numeric fields first.
    pub fn all_fields(&self) -> impl Iterator<Item = &'static str> {
        self.numeric.iter().chain(self.string.iter()).copied()
    }
}

/// Schema for a dataset kind.
pub fn fields_for(kind: DatasetKind) -> FieldSchema {
    match kind {
        DatasetKind::Sections => FieldSchema {
            kind,
            numeric: SECTION_NUMERIC,
            string: SECTION_STRING,
        },
        DatasetKind::Rooms => FieldSchema {
            kind,
            numeric: ROOM_NUMERIC,
            string: ROOM_STRING,
        },
    }
}

/// Check if `field` is numeric for `kind`. Unknown names return false.
pub fn is_numeric(kind: DatasetKind, field: &str) -> bool {
    fields_for(kind).is_numeric(field)
}

/// Check if `field` is a string field for `kind`. Unknown names return false.
pub fn is_string(kind: DatasetKind, field: &str) -> bool {
    fields_for(kind).is_string(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_fields() {
        assert!(is_numeric(DatasetKind::Sections, "avg"));
        assert!(is_numeric(DatasetKind::Sections, "year"));
        assert!(is_string(DatasetKind::Sections, "dept"));
        assert!(is_string(DatasetKind::Sections, "uuid"));
        assert!(!is_numeric(DatasetKind::Sections, "dept"));
        assert!(!is_string(DatasetKind::Sections, "seats"));
    }

    #[test]
    fn test_room_fields() {
        assert!(is_numeric(DatasetKind::Rooms, "seats"));
        assert!(is_string(DatasetKind::Rooms, "furniture"));
        assert!(!is_numeric(DatasetKind::Rooms, "avg"));
    }

    #[test]
    fn test_unknown_field_is_neither() {
        for kind in [DatasetKind::Sections, DatasetKind::Rooms] {
            assert!(!is_numeric(kind, "bogus"));
            assert!(!is_string(kind, "bogus"));
            assert_eq!(fields_for(kind).class_of(""), None);
        }
    }

    #[test]
    fn test_sets_are_disjoint() {
        for kind in [DatasetKind::Sections, DatasetKind::Rooms] {
            let schema = fields_for(kind);
            for field in schema.numeric_fields() {
                assert!(!schema.is_string(field), "{} in both sets", field);
            }
        }
        assert_eq!(fields_for(DatasetKind::Sections).all_fields().count(), 10);
        assert_eq!(fields_for(DatasetKind::Rooms).all_fields().count(), 11);
    }
}
