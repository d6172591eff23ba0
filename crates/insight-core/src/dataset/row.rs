//! Typed dataset rows.

use serde::{Deserialize, Serialize};

use super::value::Value;
use crate::catalog::DatasetKind;

/// Year assigned to sections that aggregate every offering of a course.
pub const OVERALL_SECTION_YEAR: f64 = 1900.0;

/// A course section row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SectionRecord")]
pub struct Section {
    pub uuid: String,
    /// Course number.
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub dept: String,
    pub year: f64,
    pub avg: f64,
    pub pass: f64,
    pub fail: f64,
    pub audit: f64,
}

/// Serialized form of a section, carrying the "overall" marker.
#[derive(Deserialize)]
struct SectionRecord {
    uuid: String,
    id: String,
    title: String,
    instructor: String,
    dept: String,
    year: f64,
    avg: f64,
    pass: f64,
    fail: f64,
    audit: f64,
    #[serde(default)]
    overall: bool,
}

impl From<SectionRecord> for Section {
    fn from(record: SectionRecord) -> Self {
        let section = Section {
            uuid: record.uuid,
            id: record.id,
            title: record.title,
            instructor: record.instructor,
            dept: record.dept,
            year: record.year,
            avg: record.avg,
            pass: record.pass,
            fail: record.fail,
            audit: record.audit,
        };
        if record.overall {
            section.into_overall()
        } else {
            section
        }
    }
}

impl Section {
    /// Mark this section as an overall (all-offerings) section.
    ///
    /// Overall sections are not a real academic year, so their year is
    /// pinned to 1900.
    pub fn into_overall(mut self) -> Self {
        self.year = OVERALL_SECTION_YEAR;
        self
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "year" => Some(self.year),
            "avg" => Some(self.avg),
            "pass" => Some(self.pass),
            "fail" => Some(self.fail),
            "audit" => Some(self.audit),
            _ => None,
        }
    }

    fn string(&self, field: &str) -> Option<&str> {
        match field {
            "uuid" => Some(&self.uuid),
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "instructor" => Some(&self.instructor),
            "dept" => Some(&self.dept),
            _ => None,
        }
    }
}

/// A campus room row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub fullname: String,
    pub shortname: String,
    pub number: String,
    pub name: String,
    pub address: String,
    pub lat: f64,
    pub lon: f64,
    pub seats: f64,
    #[serde(rename = "type")]
    pub room_type: String,
    pub furniture: String,
    pub href: String,
}

impl Room {
    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "lat" => Some(self.lat),
            "lon" => Some(self.lon),
            "seats" => Some(self.seats),
            _ => None,
        }
    }

    fn string(&self, field: &str) -> Option<&str> {
        match field {
            "fullname" => Some(&self.fullname),
            "shortname" => Some(&self.shortname),
            "number" => Some(&self.number),
            "name" => Some(&self.name),
            "address" => Some(&self.address),
            "type" => Some(&self.room_type),
            "furniture" => Some(&self.furniture),
            "href" => Some(&self.href),
            _ => None,
        }
    }
}

/// A row of either dataset kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Section(Section),
    Room(Room),
}

impl Row {
    /// The dataset kind this row belongs to.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Row::Section(_) => DatasetKind::Sections,
            Row::Room(_) => DatasetKind::Rooms,
        }
    }

    /// Numeric value of `field`, if it is a numeric field of this row.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self {
            Row::Section(s) => s.number(field),
            Row::Room(r) => r.number(field),
        }
    }

    /// String value of `field`, if it is a string field of this row.
    pub fn string(&self, field: &str) -> Option<&str> {
        match self {
            Row::Section(s) => s.string(field),
            Row::Room(r) => r.string(field),
        }
    }

    /// Value of `field` typed by its class.
    pub fn value(&self, field: &str) -> Option<Value> {
        self.number(field)
            .map(Value::Number)
            .or_else(|| self.string(field).map(Value::from))
    }
}

impl From<Section> for Row {
    fn from(section: Section) -> Self {
        Row::Section(section)
    }
}

impl From<Room> for Row {
    fn from(room: Room) -> Self {
        Row::Room(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section_json(overall: bool) -> serde_json::Value {
        json!({
            "uuid": "1234",
            "id": "310",
            "title": "intro sw eng",
            "instructor": "smith, jo",
            "dept": "cpsc",
            "year": 2015,
            "avg": 78.5,
            "pass": 120,
            "fail": 4,
            "audit": 0,
            "overall": overall
        })
    }

    #[test]
    fn test_section_deserialize() {
        let section: Section = serde_json::from_value(section_json(false)).unwrap();
        assert_eq!(section.year, 2015.0);
        assert_eq!(section.dept, "cpsc");
    }

    #[test]
    fn test_overall_section_year() {
        let section: Section = serde_json::from_value(section_json(true)).unwrap();
        assert_eq!(section.year, OVERALL_SECTION_YEAR);
    }

    #[test]
    fn test_row_field_access() {
        let section: Section = serde_json::from_value(section_json(false)).unwrap();
        let row = Row::from(section);
        assert_eq!(row.kind(), DatasetKind::Sections);
        assert_eq!(row.number("avg"), Some(78.5));
        assert_eq!(row.string("instructor"), Some("smith, jo"));
        assert_eq!(row.number("dept"), None);
        assert_eq!(row.value("pass"), Some(Value::Number(120.0)));
        assert_eq!(row.value("seats"), None);
    }

    #[test]
    fn test_room_type_field() {
        let room: Room = serde_json::from_value(json!({
            "fullname": "Hugh Dempster Pavilion",
            "shortname": "DMP",
            "number": "110",
            "name": "DMP_110",
            "address": "6245 Agronomy Road V6T 1Z4",
            "lat": 49.26125,
            "lon": -123.24807,
            "seats": 120,
            "type": "Tiered Large Group",
            "furniture": "Classroom-Fixed Tablets",
            "href": "http://example.com/DMP-110"
        }))
        .unwrap();
        let row = Row::from(room);
        assert_eq!(row.kind(), DatasetKind::Rooms);
        assert_eq!(row.string("type"), Some("Tiered Large Group"));
        assert_eq!(row.number("seats"), Some(120.0));
    }
}
