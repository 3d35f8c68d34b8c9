//! Fixed option lists offered to clients when registering or creating events.

pub const DEPARTMENTS: &[&str] = &[
    "College of Education",
    "College of Engineering",
    "College of Science",
    "College of Arts and Sciences",
    "College of Business and Management",
    "College of Social Sciences",
    "College of Health Sciences",
    "College of Law",
    "College of Agriculture",
    "College of Medicine",
];

pub const SECTIONS: &[&str] = &[
    "Section 1",
    "Section 2",
    "Section 3",
    "Section 4",
    "Section 5",
    "Section 6",
];
