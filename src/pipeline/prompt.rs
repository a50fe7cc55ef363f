//! One-shot prompt material: the recognized field set and the fixed exemplar
//! pair that anchors both extraction requests.

/// The clinical measurements the pipeline is allowed to extract, in report
/// order. Shared by prompt construction and value filtering; keys appearing
/// in completion output are matched against this list verbatim.
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "ph",
    "pco2",
    "po2",
    "hco3 (bicarbonate)-calc.",
    "base excess",
    "hematocrit",
    "hemoglobin",
    "saturation, o2",
    "oxyhemoglobin",
    "carboxyhemoglobin",
    "methemoglobin",
    "deoxyhemoglobin",
    "sodium",
    "potassium",
    "calcium, ionized",
    "chloride",
    "anion gap",
    "glucose",
    "lactate",
];

pub fn is_recognized_field(key: &str) -> bool {
    RECOGNIZED_FIELDS.contains(&key)
}

/// Worked example shown to the model before the real report. Lowercase,
/// because ingestion lowercases every document before storage.
pub const EXEMPLAR_REPORT: &str = "\
intensive care unit - blood gas analysis
collected: 14-03-2023 01:12
specimen type: arterial blood

blood gas values
ph                        7.458
pco2                      40.9    mmhg
po2                       56.0    mmhg
hco3 (bicarbonate)-calc.  28.3    mmol/l
base excess               4.1     mmol/l

oximetry values
hematocrit                29      %
hemoglobin                10.0    g/dl
saturation, o2            88.4    %
oxyhemoglobin             88.0    %
carboxyhemoglobin         0.2     %
methemoglobin             0.3     %
deoxyhemoglobin           11.5    %

electrolyte values
sodium                    140     mmol/l
potassium                 3.9     mmol/l
calcium, ionized          0.39    mmol/l
chloride                  98      mmol/l
anion gap                 17.2    mmol/l

metabolite values
glucose                   147     mg/dl
lactate                   13      mg/dl
";

/// Expected output for the exemplar report, pre-serialized. One entry per
/// recognized field, in the same order as [`RECOGNIZED_FIELDS`].
pub const EXEMPLAR_VALUES_JSON: &str = r#"{"ph": 7.458, "pco2": 40.9, "po2": 56.0, "hco3 (bicarbonate)-calc.": 28.3, "base excess": 4.1, "hematocrit": 29, "hemoglobin": 10.0, "saturation, o2": 88.4, "oxyhemoglobin": 88.0, "carboxyhemoglobin": 0.2, "methemoglobin": 0.3, "deoxyhemoglobin": 11.5, "sodium": 140, "potassium": 3.9, "calcium, ionized": 0.39, "chloride": 98, "anion gap": 17.2, "glucose": 147, "lactate": 13}"#;

/// Expected date output for the exemplar report.
pub const EXEMPLAR_DATE: &str = "14-03-2023 01:12";

/// System instruction for the values pass: a domain-expert annotator plus the
/// worked exemplar document and its expected mapping.
pub fn build_values_system_prompt() -> String {
    format!(
        "You are an ICU nurse with 20 years of experience reading blood-gas lab reports. \
         When I give you a text string that includes a lab report like this: {EXEMPLAR_REPORT}, \
         return a dictionary with the lab results like this: {EXEMPLAR_VALUES_JSON}"
    )
}

/// System instruction for the date pass: same framing, with a single
/// canonical timestamp as the expected output.
pub fn build_date_system_prompt() -> String {
    format!(
        "You are an ICU nurse with 20 years of experience reading blood-gas lab reports. \
         When I give you a text string that includes a lab report like this: {EXEMPLAR_REPORT}, \
         return a string with the date and time like this: {EXEMPLAR_DATE}"
    )
}
