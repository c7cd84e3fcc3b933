//! Built-in term lists.
//!
//! Terms are case-sensitive literal fragments. Entries such as `sMRI` and
//! `sLABS` are kept exactly as curated.

use crate::model::TermSets;

pub const GEORGETOWN_MED_TERMS: &[&str] = &[
    "MEDICAL", "MEDICINE", "HOSPITAL",
    "CLINIC", "REHAB", "EMERGEN",
    "URGENT", "DIAGNOSTIC", "DIALYSIS",
    "HOSPICE", "TELEHEALTH", "SURGERY",
    "SURGIC", " MD ", "D.O.", "FOOT AND ANKLE",
    "ANESTHESIOLOG", "OBSTETRIC", "GYNECOLOG",
    "UROLOG", "NEPHROLOG", "PLASTIC SURGERY",
    "SURGEON", "INTERNAL MEDICINE",
    "FAMILY MEDICINE", "NURSING HOME",
    "ALLERGY", "ALLERGIST", "DIABETES",
    "KIDNEY", "CARDIOVASC", "CARDIO",
    "BRAIN AND SPINE", "NEUROSURGERY",
    "NEUROLOG", "ORTHOPED", "ANESTHESIO",
    "ANESTHESIA", "NEUROSPINE", "RESPIRATORY",
    "IMMUNOLOG", "ENDOCRINOLOG", "CHIROPRACT",
    "OPTOMETR", "GASTROENTEROLOG", "ENDOSCOPY",
    "sMRI", "sEYE", "OPTHALMOLOG", "sFERTILITY",
    "THERAPHY", "PSYCHIATR", "BEHAVIOR",
    "ENDODONTIC", "ORTHODON", "DENTIST",
    "ORTHOTIC", "RESEARCH", "ONCOLOG",
    "CANCER", "AMBULANCE", "LABORATORY",
    "sLABS", " LABS",
];

pub const GEORGETOWN_EXCLUDE_TERMS: &[&str] = &[
    "BANK", "LAWN", "BOND",
    "CREDIT", "ANIMAL", "MOTORS",
    "CAR", "VETERINARY", "FCU",
];

pub const GUELPH_MED_TERMS: &[&str] = &[
    "CLINIC", "HEALTH", "HOSPITAL",
    "MEDICAL CENTER", "AMBULANCE",
    "DOCTOR", "HEALTHCARE", "HEART",
    "HOSPICE", "HOSPITALIZED",
    "MEDICINE", "NURSE", "NURSING",
    "OUTPATIENT", "PEDIATRIC",
    "PHYSICIAN", "PREVENTION",
    "PSYCHIATRIC", "SPECIALIST",
    "WELFARE", "DENTAL", "DISPENSARY",
    "GYNECOLOGIST", "IMMUNIZATION",
    "INFIRMARY", "ORTHOPEDIC",
    "PATIENT", "PHARMACY", "REPRODUCTIVE",
    "SURGICAL", "WELLBEING",
];

pub const GUELPH_EXCLUDE_TERMS: &[&str] = &[
    "AID", "CAMP", "CARE", "CENTER",
    "EDUCATION", "ENVIRONMENTAL",
    "HYGIENE", "NEARBY", "NUTRITION",
    "POOR", "PUBLIC", "STUDY",
    "VETERINARY",
];

/// Names accepted by [`builtin`].
///
/// The manual top-N lists come from review of the most frequent plaintiffs
/// and are withheld for privacy, so they ship empty and never match.
pub const BUILTIN_NAMES: &[&str] = &[
    "georgetown",
    "guelph",
    "ct_manual_top_100",
    "ct_manual_top_1000",
];

pub fn builtin(name: &str) -> Option<TermSets> {
    match name {
        "georgetown" => Some(TermSets::new(name, GEORGETOWN_MED_TERMS, GEORGETOWN_EXCLUDE_TERMS)),
        "guelph" => Some(TermSets::new(name, GUELPH_MED_TERMS, GUELPH_EXCLUDE_TERMS)),
        "ct_manual_top_100" | "ct_manual_top_1000" => Some(TermSets::new(name, &[], &[])),
        _ => None,
    }
}

/// Parse a newline-delimited term file, one term per line.
///
/// Terms are kept byte for byte apart from the line ending, so padded terms
/// like `" MD "` survive. Blank lines and `#` comments are skipped.
pub fn parse_term_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .map(str::to_string)
        .collect()
}
