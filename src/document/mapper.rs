//! Contract record to placeholder map.
//!
//! Each rule is a small function so it can be tested on its own: stage names,
//! grade trimming, gendered labels, section flags, repeated rows, the three
//! dual-calendar dates, and the fee lines.

use chrono::NaiveDate;

use crate::contract::model::{
    ContactPerson, Contract, ContractEditor, Guardian, Payment, PaymentType, SchoolTrack, Sibling,
    Stage, Student, TransportationPath,
};

use super::calendar::{CalendarConverter, CalendarDate};
use super::fees::FeeBreakdown;
use super::numerals::{localize, localize_number};
use super::placeholders::PlaceholderMap;
use super::tables::DocumentTables;
use super::validation::CheckedContract;
use super::DocumentError;

/// Printed in place of optional values that were not provided.
pub const MISSING_VALUE: &str = "............";
/// Prefix stripped from free-text grades ("الصف الأول" -> "الأول").
pub const GRADE_PREFIX: &str = "الصف ";
/// Flag that selects feminine wording in the template.
pub const FEMININE_FLAG: &str = "isGirlsSchool";

/// Builds the placeholder map for one contract.
#[derive(Debug, Clone)]
pub struct FieldMapper {
    calendar: CalendarConverter,
    tables: DocumentTables,
}

impl FieldMapper {
    pub fn new(calendar: CalendarConverter, tables: DocumentTables) -> Self {
        Self { calendar, tables }
    }

    pub fn calendar(&self) -> &CalendarConverter {
        &self.calendar
    }

    pub fn tables(&self) -> &DocumentTables {
        &self.tables
    }

    /// Compute fees for a stage and transportation path with the configured rates.
    pub fn fees(
        &self,
        stage: Option<&Stage>,
        path: Option<&TransportationPath>,
    ) -> FeeBreakdown {
        self.tables.fees.compute(stage, path)
    }

    pub fn build_placeholders(&self, contract: &Contract) -> Result<PlaceholderMap, DocumentError> {
        let CheckedContract {
            guardian,
            editor,
            student,
            payment,
            birth_date,
            id_issue_date,
        } = contract.checked().map_err(DocumentError::FieldMapping)?;

        let mut map = PlaceholderMap::new();
        self.map_student(&mut map, student);
        self.map_siblings(&mut map, &student.siblings);
        map_guardian(&mut map, guardian);
        map_editor(&mut map, editor);
        self.map_payment(&mut map, payment, student.required_stage.as_ref());
        self.map_dates(&mut map, birth_date, id_issue_date)?;

        log::debug!("Built {} placeholders for contract", map.len());
        Ok(map)
    }

    fn map_student(&self, map: &mut PlaceholderMap, student: &Student) {
        map.insert_text("student_name", text_or_missing(&student.name));
        map.insert_text("student_nationality", text_or_missing(&student.nationality));
        map.insert_text("student_birth_place", text_or_missing(&student.birth_place));
        map.insert_text("student_id_number", text_or_missing(&student.id_number));
        map.insert_text(
            "student_id_issue_place",
            text_or_missing(&student.id_issue_place),
        );
        map.insert_text(
            "student_id_issue_date",
            student
                .id_issue_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
        );
        map.insert_text(
            "student_previously_enrolled",
            yes_no(student.previously_enrolled),
        );
        map.insert_text("previousSchoolName", text_or_missing(&student.previous_school_name));
        map.insert_text("previousSchoolCity", text_or_missing(&student.previous_school_city));
        map.insert_text("previousSchoolType", text_or_missing(&student.previous_school_type));

        let track = student.required_school.as_ref();
        let girls = track.is_some_and(SchoolTrack::is_girls);
        map.insert_text(
            "student_required_school",
            track.map(SchoolTrack::as_str).unwrap_or(MISSING_VALUE),
        );
        map.insert_text("schoolSexType", if girls { "بنات" } else { "بنين" });
        map.insert_text("student_noun", if girls { "الطالبة" } else { "الطالب" });
        map.insert_flag(FEMININE_FLAG, girls);

        let stage = student.required_stage.as_ref();
        map.insert_text(
            "student_required_stage",
            stage
                .map(|s| self.tables.stage_labels.label_for(s))
                .unwrap_or(MISSING_VALUE),
        );
        map.insert_flag("isKindergarten", stage == Some(&Stage::Kindergarten));
        map.insert_flag("isElementary", stage == Some(&Stage::Elementary));
        map.insert_flag("isMiddle", stage == Some(&Stage::Middle));
        map.insert_flag("isHigh", stage == Some(&Stage::High));
        map.insert_flag("hasPayment", stage.is_some());

        map.insert_text(
            "student_required_grade",
            grade_or_missing(&student.required_grade),
        );
        map.insert_text(
            "student_has_siblings_in_ithraa",
            yes_no(student.has_siblings_in_ithraa),
        );
    }

    fn map_siblings(&self, map: &mut PlaceholderMap, siblings: &[Sibling]) {
        let rows = siblings
            .iter()
            .map(|sibling| {
                let mut row = PlaceholderMap::new();
                row.insert_text("name", text_or_missing(&sibling.name));
                row.insert_text("school", text_or_missing(&sibling.school));
                row.insert_text(
                    "stage",
                    sibling
                        .stage
                        .as_ref()
                        .map(|s| self.tables.stage_labels.label_for(s))
                        .unwrap_or(MISSING_VALUE),
                );
                row.insert_text(
                    "grade",
                    grade_or_missing(&sibling.grade),
                );
                row
            })
            .collect();

        map.insert_flag("hasSiblings", !siblings.is_empty());
        map.insert_list("siblings", rows);
    }

    fn map_payment(&self, map: &mut PlaceholderMap, payment: &Payment, stage: Option<&Stage>) {
        let payment_type = payment.payment_type.as_ref();
        map.insert_flag("isAnnual", payment_type == Some(&PaymentType::Annual));
        map.insert_flag("isQuarterly", payment_type == Some(&PaymentType::Quarterly));
        map.insert_text(
            "payment_type",
            payment_type.map(PaymentType::as_str).unwrap_or(MISSING_VALUE),
        );

        let transportation = &payment.transportation;
        let wants_transportation = transportation.required.unwrap_or(false);
        map.insert_flag("wantsTransportation", wants_transportation);
        map.insert_text(
            "payment_transportation_required",
            yes_no(transportation.required),
        );
        map.insert_text(
            "payment_transportation_neighborhood",
            text_or_missing(&transportation.neighborhood),
        );

        let fees = self.fees(stage, transportation.path.as_ref());
        map.insert_text(
            "payment_transportation_path",
            fees.path_label.as_deref().unwrap_or(MISSING_VALUE),
        );
        map_fees(map, &fees);
    }

    fn map_dates(
        &self,
        map: &mut PlaceholderMap,
        birth_date: NaiveDate,
        id_issue_date: NaiveDate,
    ) -> Result<(), DocumentError> {
        let birth = self.calendar.calendar_date(birth_date)?;
        insert_date(map, "birthDate_G_M", "birthDate_H_H", &birth, false);

        let issued = self.calendar.calendar_date(id_issue_date)?;
        insert_date(map, "idIssueDate_M_M", "idIssueDate_H_H", &issued, true);

        let today = self.calendar.current_dates()?;
        insert_date(map, "contractDate_M", "contractDate_H", &today, true);
        map.insert_text("contractDate_dayName", localize(today.gregorian.day_name));

        Ok(())
    }
}

/// Six fields per date: `{gregorian}day/month/year` and `{hijri}day/month/year`.
fn insert_date(
    map: &mut PlaceholderMap,
    gregorian_prefix: &str,
    hijri_prefix: &str,
    date: &CalendarDate,
    localized: bool,
) {
    let render = |value: String| if localized { localize(&value) } else { value };

    map.insert_text(format!("{gregorian_prefix}day"), render(date.gregorian.day.to_string()));
    map.insert_text(
        format!("{gregorian_prefix}month"),
        render(date.gregorian.month.to_string()),
    );
    map.insert_text(
        format!("{gregorian_prefix}year"),
        render(date.gregorian.year.to_string()),
    );
    map.insert_text(format!("{hijri_prefix}day"), render(date.hijri.day.to_string()));
    map.insert_text(format!("{hijri_prefix}month"), render(date.hijri.month.to_string()));
    map.insert_text(format!("{hijri_prefix}year"), render(date.hijri.year.to_string()));
}

fn map_fees(map: &mut PlaceholderMap, fees: &FeeBreakdown) {
    map.insert_text("SchoolMoneyRequired", fees.base_tuition.to_string());
    map.insert_text(
        "TransportationMoneyRequired",
        fees.transportation_surcharge.to_string(),
    );
    map.insert_text("TotalSchoolMoneyRequired", fees.total.to_string());
    map.insert_text("TotalSchoolMoneyRequired_ar", localize_number(fees.total));
}

fn map_guardian(map: &mut PlaceholderMap, guardian: &Guardian) {
    map.insert_text("guardian_name", text_or_missing(&guardian.name));
    map.insert_text("guardian_id_number", text_or_missing(&guardian.id_number));
    map.insert_text("guardian_relationship", text_or_missing(&guardian.relationship));
    map.insert_text(
        "guardian_absher_mobile",
        text_or_missing(&guardian.absher_mobile_number),
    );
    map.insert_text(
        "guardian_additional_mobile",
        text_or_missing(&guardian.additional_mobile_number),
    );
    map.insert_text(
        "guardian_residential_address",
        text_or_missing(&guardian.residential_address),
    );
    map.insert_text("guardian_profession", text_or_missing(&guardian.profession));
    map.insert_text("guardian_work_address", text_or_missing(&guardian.work_address));
    map.insert_text("guardian_work_phone", text_or_missing(&guardian.work_phone_number));
    map.insert_text("guardian_extension", text_or_missing(&guardian.extension));

    map.insert_flag("hasContactPersons", !guardian.contact_persons.is_empty());
    map.insert_list(
        "contactPersons",
        guardian.contact_persons.iter().map(contact_row).collect(),
    );
}

fn contact_row(person: &ContactPerson) -> PlaceholderMap {
    let mut row = PlaceholderMap::new();
    row.insert_text("name", text_or_missing(&person.name));
    row.insert_text("relationship", text_or_missing(&person.relationship));
    row.insert_text("mobileNumber", text_or_missing(&person.mobile_number));
    row
}

fn map_editor(map: &mut PlaceholderMap, editor: &ContractEditor) {
    map.insert_text("editor_name", text_or_missing(&editor.name));
    map.insert_text("editor_id_number", text_or_missing(&editor.id_number));
    map.insert_text("editor_relationship", text_or_missing(&editor.relationship));
    map.insert_text(
        "editor_absher_mobile",
        text_or_missing(&editor.absher_mobile_number),
    );
    map.insert_text(
        "editor_additional_mobile",
        text_or_missing(&editor.additional_mobile_number),
    );
    map.insert_text(
        "editor_residential_address",
        text_or_missing(&editor.residential_address),
    );
    map.insert_text("editor_profession", text_or_missing(&editor.profession));
    map.insert_text("editor_work_address", text_or_missing(&editor.work_address));
    map.insert_text("editor_work_phone", text_or_missing(&editor.work_phone_number));
    map.insert_text("editor_extension", text_or_missing(&editor.extension));
}

/// Strip the "الصف " prefix and surrounding whitespace.
pub fn normalize_grade(grade: &str) -> String {
    let trimmed = grade.trim();
    trimmed
        .strip_prefix(GRADE_PREFIX)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

fn grade_or_missing(grade: &Option<String>) -> String {
    match grade.as_deref().map(normalize_grade) {
        Some(grade) if !grade.is_empty() => grade,
        _ => MISSING_VALUE.to_string(),
    }
}

fn text_or_missing(value: &Option<String>) -> &str {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => MISSING_VALUE,
    }
}

fn yes_no(value: Option<bool>) -> &'static str {
    if value.unwrap_or(false) {
        "Yes"
    } else {
        "No"
    }
}
