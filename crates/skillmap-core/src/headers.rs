//! Accepted column headers for each logical field.
//!
//! Input sheets come from hand-edited spreadsheets, so each field accepts a
//! short, ordered list of synonyms. The first alias with a non-empty value in
//! a row wins.

pub const QUESTION_NO: &[&str] = &[
    "Question No",
    "QuestionNo",
    "Question Number",
    "Question",
    "Q No",
    "question_no",
];

pub const SKILL_CODE: &[&str] = &["Skill Code", "SkillCode", "Skill", "skill_code"];

pub const SKILL_DESCRIPTION: &[&str] = &[
    "Skill Description",
    "SkillDescription",
    "Description",
    "skill_description",
];

pub const MAX_MARKS: &[&str] = &["Max Marks", "MaxMarks", "Marks", "max_marks"];

pub const STUDENT_NAME: &[&str] = &["Student Name", "StudentName", "Name", "student_name"];

pub const STUDENT_ID: &[&str] = &[
    "Student ID",
    "StudentID",
    "Student Id",
    "ID",
    "student_id",
];
