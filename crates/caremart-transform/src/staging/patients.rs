//! `stg_patients`: cleaned patient demographics.

use caremart_model::{Patient, RawPatient, RelationName, StageDiagnostics};

use super::{Staged, require_date, require_key};
use crate::context::RunContext;
use crate::expressions::{
    age_group, calculate_age, clean_text, initcap, is_valid_email, is_valid_phone, lower_text,
    normalize_phone, upper_text,
};

/// Join the present name parts with a single space.
fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(first), Some(last)) => Some(format!("{first} {last}")),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

pub fn stg_patients(raw: &[RawPatient], ctx: &RunContext) -> Staged<Patient> {
    let mut diagnostics = StageDiagnostics::new(RelationName::StgPatients, raw.len());
    let mut rows = Vec::with_capacity(raw.len());

    for record in raw {
        let Some(patient_id) =
            require_key(&mut diagnostics, "patient_id", record.patient_id.as_deref())
        else {
            continue;
        };
        let Some(date_of_birth) = require_date(
            &mut diagnostics,
            "date_of_birth",
            record.date_of_birth.as_deref(),
        ) else {
            continue;
        };

        let first_name = clean_text(record.first_name.as_deref()).map(|v| initcap(&v));
        let last_name = clean_text(record.last_name.as_deref()).map(|v| initcap(&v));
        let email = lower_text(record.email.as_deref());
        let phone = record.phone.as_deref().and_then(normalize_phone);
        let age = calculate_age(date_of_birth, ctx.reference_date);

        rows.push(Patient {
            full_name: full_name(first_name.as_deref(), last_name.as_deref()),
            patient_id,
            first_name,
            last_name,
            date_of_birth,
            age,
            age_group: age_group(age),
            gender: upper_text(record.gender.as_deref()),
            has_valid_email: is_valid_email(email.as_deref()),
            has_valid_phone: is_valid_phone(phone.as_deref()),
            email,
            phone,
            address: clean_text(record.address.as_deref()),
            city: clean_text(record.city.as_deref()).map(|v| initcap(&v)),
            state: upper_text(record.state.as_deref()),
            zip_code: clean_text(record.zip_code.as_deref()),
            insurance_provider: clean_text(record.insurance_provider.as_deref()),
            insurance_id: clean_text(record.insurance_id.as_deref()),
            blood_type: upper_text(record.blood_type.as_deref()),
            emergency_contact: clean_text(record.emergency_contact.as_deref()),
        });
    }

    Staged::finish(rows, diagnostics)
}
