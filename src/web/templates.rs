use super::error::WebError;
use crate::domain::model::{FEATURE_COUNT, FEATURE_FIELDS};
use serde::Serialize;
use tera::{Context, Tera};

pub const INDEX: &str = "index.html";

const INDEX_SOURCE: &str = include_str!("../../templates/index.html");

/// Load templates from `template_dir` when given, otherwise use the built-in
/// page.
pub fn load_templates(template_dir: Option<&str>) -> Result<Tera, WebError> {
    let tera = match template_dir {
        Some(dir) => Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))?,
        None => {
            let mut tera = Tera::default();
            tera.add_raw_template(INDEX, INDEX_SOURCE)?;
            tera
        }
    };

    if !tera.get_template_names().any(|name| name == INDEX) {
        return Err(WebError::MissingTemplate(INDEX.to_string()));
    }
    Ok(tera)
}

const FIELD_LABELS: [&str; FEATURE_COUNT] = [
    "Fixed acidity",
    "Volatile acidity",
    "Citric acid",
    "Residual sugar",
    "Chlorides",
    "Free sulfur dioxide",
    "Total sulfur dioxide",
    "Density",
    "pH",
    "Sulphates",
    "Alcohol",
];

#[derive(Serialize)]
struct FieldView {
    name: &'static str,
    label: &'static str,
}

fn field_views() -> Vec<FieldView> {
    FEATURE_FIELDS
        .into_iter()
        .zip(FIELD_LABELS)
        .map(|(name, label)| FieldView { name, label })
        .collect()
}

/// Everything the home page can display.
#[derive(Debug, Default)]
pub struct IndexPage {
    pub message: Option<String>,
    pub prediction: Option<String>,
    pub error_message: Option<String>,
}

impl IndexPage {
    pub fn render(&self, tera: &Tera) -> Result<String, WebError> {
        let mut context = Context::new();
        context.insert("fields", &field_views());
        context.insert("message", &self.message);
        context.insert("prediction", &self.prediction);
        context.insert("error_message", &self.error_message);
        Ok(tera.render(INDEX, &context)?)
    }
}
