//! Imported entity kinds and their static import descriptions
//!
//! Each [`EntityKind`] has exactly one [`EntityImportSpec`] naming the source
//! file, the row mapping, the two replica slots and which of the optional
//! pipeline stages apply to it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity kinds loaded from extract files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Course,
    Enrolment,
    User,
}

impl EntityKind {
    /// All entity kinds, in the order a full sync processes them
    pub const ALL: [EntityKind; 3] = [EntityKind::Course, EntityKind::Enrolment, EntityKind::User];

    /// Returns the static import description for this kind
    pub fn spec(self) -> &'static EntityImportSpec {
        match self {
            EntityKind::Course => &COURSE_SPEC,
            EntityKind::Enrolment => &ENROLMENT_SPEC,
            EntityKind::User => &USER_SPEC,
        }
    }

    /// Short name used on the command line and in log fields
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Enrolment => "enrol",
            EntityKind::User => "user",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "course" | "courses" => Ok(EntityKind::Course),
            "enrol" | "enrolment" | "enrolments" | "enrollment" => Ok(EntityKind::Enrolment),
            "user" | "users" => Ok(EntityKind::User),
            other => Err(format!(
                "Unknown entity '{other}'. Must be one of: course, enrol, user"
            )),
        }
    }
}

/// Static description of how one entity is imported
#[derive(Debug)]
pub struct EntityImportSpec {
    pub kind: EntityKind,
    /// File name inside the sync directory
    pub filename: &'static str,
    /// Ordered `(xml_field, column)` pairs
    pub rowmapping: &'static [(&'static str, &'static str)],
    /// The two replica slots, `[A, B]`
    pub replicas: [&'static str; 2],
    /// Settings key holding the active replica name
    pub active_setting_key: &'static str,
    /// Whether every row is also written to `<table>_log`
    pub keeps_log_table: bool,
    /// Whether rows are dispatched on their `ACTION` (update vs delete)
    pub dispatches_actions: bool,
    /// Whether row-count and drift checks run after the row loop
    pub verifies_row_counts: bool,
}

impl EntityImportSpec {
    /// Returns true if `name` is one of this entity's replica slots
    pub fn is_replica(&self, name: &str) -> bool {
        self.replicas.contains(&name)
    }
}

/// Prefix shared by every table the importer writes
pub const TABLE_PREFIX: &str = "xmlsync_";

/// Table holding replica `replica`'s rows
pub fn replica_table(replica: &str) -> String {
    format!("{TABLE_PREFIX}{replica}")
}

/// Log table paired with `table`
pub fn log_table(table: &str) -> String {
    format!("{table}_log")
}

/// Settings key under which a replica's metadata is stored
pub fn metadata_key(replica: &str) -> String {
    format!("{replica}_metadata")
}

static COURSE_SPEC: EntityImportSpec = EntityImportSpec {
    kind: EntityKind::Course,
    filename: "moodle_crs.xml",
    rowmapping: &[
        ("COURSE_IDNUMBER", "course_idnumber"),
        ("COURSE_FULLNAME", "course_fullname"),
        ("COURSE_SHORTNAME", "course_shortname"),
        ("COURSE_TEMPLATE", "course_template"),
        ("COURSE_VISIBILITY", "course_visibility"),
    ],
    replicas: ["courseimport_a", "courseimport_b"],
    active_setting_key: "courseimport_activereplica",
    keeps_log_table: true,
    dispatches_actions: true,
    verifies_row_counts: false,
};

static ENROLMENT_SPEC: EntityImportSpec = EntityImportSpec {
    kind: EntityKind::Enrolment,
    filename: "moodle_enr.xml",
    rowmapping: &[
        ("COURSE_IDNUMBER", "course_idnumber"),
        ("USERNAME", "username"),
        ("ROLE_SHORTNAME", "role_shortname"),
        ("USER_IDNUMBER", "user_idnumber"),
        ("VISA_NSI", "visa_nsi"),
        ("ETHNIC_CODES", "ethnic_codes"),
        ("ETHNIC_DESCRIPTION", "ethnic_description"),
        ("RESIDENCY", "residency"),
        ("UNDER_25", "under_25"),
        ("MAORI", "maori"),
        ("PACIFIC", "pacific"),
        ("INTERNATIONAL", "international"),
    ],
    replicas: ["enrolimport_a", "enrolimport_b"],
    active_setting_key: "enrolimport_activereplica",
    keeps_log_table: true,
    dispatches_actions: false,
    verifies_row_counts: true,
};

static USER_SPEC: EntityImportSpec = EntityImportSpec {
    kind: EntityKind::User,
    filename: "moodle_per.xml",
    rowmapping: &[
        ("USERNAME", "username"),
        ("PASSWORD", "password"),
        ("EMAIL", "email"),
        ("FIRSTNAME", "firstname"),
        ("LASTNAME", "lastname"),
        ("CITY", "city"),
        ("COUNTRY", "country"),
        ("LANG", "lang"),
        ("DESCRIPTION", "description"),
        ("IDNUMBER", "idnumber"),
        ("INSTITUTION", "institution"),
        ("DEPARTMENT", "department"),
        ("PHONE1", "phone1"),
        ("PHONE2", "phone2"),
        ("MIDDLENAME", "middlename"),
        ("ACTIVATION_DT", "activation_dt"),
        ("DEACTIVATE_DT", "deactivate_dt"),
        ("ARCHIVE_DT", "archive_dt"),
        ("PURGE_DT", "purge_dt"),
    ],
    replicas: ["userimport_a", "userimport_b"],
    active_setting_key: "userimport_activereplica",
    keeps_log_table: false,
    dispatches_actions: false,
    verifies_row_counts: true,
};
