//! Markdown rendering for reports and the educational catalog.
//!
//! Rendering is a pure function of the report state: the same state always
//! produces the same bytes.

use std::sync::OnceLock;

use minijinja::{Environment, context};
use time::format_description::well_known::Rfc3339;

use crate::catalog::{ALL_DISEASES, DiseaseKind, decorate_label_code};
use crate::error::DermaScanError;
use crate::prediction::{Prediction, PredictionSource, ReportState};

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

const IDLE_REPORT: &str = "\
# DermaVerse Analysis

No analysis yet.

Upload a dermoscopic image to begin:

    dermascan analyze <IMAGE>

Accepted formats: JPG or PNG (max. 5MB).
";

const LOADING_REPORT: &str = "\
# DermaVerse Analysis

Analyzing image…

    ░░░░░░░░░░░░░░░░░░░░░░░░
    ░░░░░░░░░░░░░░░░
    ░░░░░░░░░░░░
";

fn env() -> Result<&'static Environment<'static>, DermaScanError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_filter("pct", |v: f64| -> String { format!("{:.0}%", v * 100.0) });
    env.add_template("report.md.j2", include_str!("../../templates/report.md.j2"))?;
    env.add_template(
        "diseases.md.j2",
        include_str!("../../templates/diseases.md.j2"),
    )?;

    Ok(ENV.get_or_init(move || env))
}

#[derive(serde::Serialize)]
struct ImageView {
    file_name: String,
    mime: &'static str,
    size_kib: u64,
}

#[derive(serde::Serialize)]
struct Pill {
    code: String,
    label: String,
    value: f64,
}

#[derive(serde::Serialize)]
struct Tab {
    name: &'static str,
    active: bool,
}

pub(crate) fn report(state: &ReportState) -> Result<String, DermaScanError> {
    match state {
        ReportState::Idle => Ok(IDLE_REPORT.to_string()),
        ReportState::Loading => Ok(LOADING_REPORT.to_string()),
        ReportState::Settled(prediction) => settled_report(prediction),
    }
}

fn settled_report(prediction: &Prediction) -> Result<String, DermaScanError> {
    let entry = prediction.disease.entry();

    let image = prediction.image.as_ref().map(|image| ImageView {
        file_name: image.file_name.clone(),
        mime: image.mime,
        size_kib: (image.size_bytes as u64).div_ceil(1024),
    });

    let badge = prediction.binary_prediction.as_ref().map(|verdict| {
        let mark = if prediction.malignant { "🚨" } else { "✅" };
        format!(
            "{mark} {verdict} ({:.0}%)",
            prediction.confidence * 100.0
        )
    });

    // One pill per multiclass entry, decorated for known codes.
    let pills: Vec<Pill> = prediction
        .multiclass_probabilities
        .iter()
        .flatten()
        .map(|(code, value)| Pill {
            code: code.clone(),
            label: decorate_label_code(code).to_string(),
            value: *value,
        })
        .collect();

    let output = env()?.get_template("report.md.j2")?.render(context! {
        fallback => prediction.source == PredictionSource::Fallback,
        malignant => prediction.malignant,
        name => entry.name,
        severity => entry.severity.as_str(),
        description => entry.description,
        action => entry.action,
        confidence => prediction.confidence,
        final_code => prediction.final_prediction.as_deref(),
        final_label => prediction
            .final_prediction
            .as_deref()
            .map(decorate_label_code),
        image => image,
        badge => badge,
        pills => pills,
        analyzed_at => prediction.analyzed_at.format(&Rfc3339)?,
    })?;

    Ok(output)
}

/// Renders the educational catalog: a tab bar of every entry with the active
/// one marked, then the active entry in full. Defaults to melanoma.
pub(crate) fn diseases(selection: Option<DiseaseKind>) -> Result<String, DermaScanError> {
    let active = selection.unwrap_or(DiseaseKind::Melanoma);

    let tabs: Vec<Tab> = ALL_DISEASES
        .iter()
        .map(|kind| Tab {
            name: kind.entry().name,
            active: *kind == active,
        })
        .collect();

    let entry = active.entry();
    let output = env()?.get_template("diseases.md.j2")?.render(context! {
        tabs => tabs,
        entry => entry,
        severity => entry.severity.as_str(),
    })?;

    Ok(output)
}
