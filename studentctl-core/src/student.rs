use std::fmt;

use serde::{Deserialize, Serialize};

/// A student record. The id is chosen by the caller, never generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub course: String,
}

impl Student {
    pub fn new(id: i32, name: impl Into<String>, age: i32, course: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            course: course.into(),
        }
    }

    /// Case-insensitive substring match against every field.
    ///
    /// A blank keyword matches everything.
    pub fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return true;
        }

        [
            self.id.to_string(),
            self.name.to_lowercase(),
            self.age.to_string(),
            self.course.to_lowercase(),
        ]
        .iter()
        .any(|field| field.contains(&keyword))
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Age: {}, Course: {}",
            self.id, self.name, self.age, self.course
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_listing_format() {
        let student = Student::new(1, "Alice", 20, "CS");
        assert_eq!(student.to_string(), "ID: 1, Name: Alice, Age: 20, Course: CS");
    }

    #[test]
    fn keyword_matches_any_field() {
        let student = Student::new(17, "Alice Smith", 20, "Computer Science");

        assert!(student.matches("alice"));
        assert!(student.matches("SCIENCE"));
        assert!(student.matches("17"));
        assert!(student.matches("20"));
        assert!(student.matches("  "));
        assert!(!student.matches("history"));
    }

    #[test]
    fn serializes_with_field_names() {
        let student = Student::new(42, "Bob", 31, "Physics");
        let json = serde_json::to_value(&student).unwrap();

        assert_eq!(json["id"], 42);
        assert_eq!(json["name"], "Bob");
        assert_eq!(json["age"], 31);
        assert_eq!(json["course"], "Physics");
    }
}
