//! Builds the [`ScreeningCatalogue`] from the files persisted next to the service:
//!
//! - `questions.csv`: the question sheet (see [`QuestionCatalogue::from_reader`])
//! - `units.csv`: `unit,category,algorithm,feature_set,artifact,weight`, the performance table
//! - `features.csv`: `feature_set,question`, ordered feature lists shared by units
//! - `models/<artifact>.json`: serialized model parameters
//!
//! Every failure here is fatal; the engine never runs on a partially loaded catalogue.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use super::catalogue::{CatalogueError, ClassifierCatalogue, ClassifierUnit, ScreeningCatalogue};
use super::classifier::ModelArtifact;
use super::domain::{Category, QuestionId, UnitId};
use super::questions::QuestionCatalogue;
use crate::config::CatalogueConfig;

/// One row of the performance table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnitRecord {
    pub unit: String,
    pub category: String,
    pub algorithm: String,
    pub feature_set: String,
    pub artifact: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
struct FeatureRow {
    feature_set: String,
    question: String,
}

/// Ordered feature lists keyed by feature-set name.
pub type FeatureSets = HashMap<String, Vec<QuestionId>>;

pub struct CatalogueLoader {
    config: CatalogueConfig,
}

impl CatalogueLoader {
    pub fn new(config: CatalogueConfig) -> Self {
        Self { config }
    }

    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::new(CatalogueConfig::from_data_dir(data_dir))
    }

    pub fn load(&self) -> Result<ScreeningCatalogue, CatalogueError> {
        let questions = QuestionCatalogue::from_reader(open(&self.config.questions_file)?)?;
        let units = parse_units(open(&self.config.units_file)?, &self.config.units_file)?;
        let feature_sets = parse_feature_sets(
            open(&self.config.features_file)?,
            &self.config.features_file,
        )?;

        let catalogue = assemble(questions, units, &feature_sets, |artifact| {
            self.read_artifact(artifact)
        })?;

        let summary = catalogue.summary();
        info!(
            questions = summary.questions,
            units = summary.units,
            categories = summary.categories.len(),
            "screening catalogue loaded"
        );
        Ok(catalogue)
    }

    fn read_artifact(&self, artifact: &str) -> Result<ModelArtifact, CatalogueError> {
        let path = artifact_path(&self.config.models_dir, artifact);
        let raw = std::fs::read_to_string(&path).map_err(|source| CatalogueError::Io {
            path: path.clone(),
            source,
        })?;
        ModelArtifact::from_json(&raw).map_err(|source| CatalogueError::Artifact {
            artifact: artifact.to_string(),
            source,
        })
    }
}

fn open(path: &Path) -> Result<std::fs::File, CatalogueError> {
    std::fs::File::open(path).map_err(|source| CatalogueError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn artifact_path(models_dir: &Path, artifact: &str) -> PathBuf {
    let file = Path::new(artifact);
    if file.extension().is_some() {
        models_dir.join(file)
    } else {
        models_dir.join(format!("{artifact}.json"))
    }
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> CatalogueError + '_ {
    move |source| CatalogueError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

pub fn parse_units<R: Read>(reader: R, path: &Path) -> Result<Vec<UnitRecord>, CatalogueError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader
        .deserialize::<UnitRecord>()
        .map(|row| row.map_err(csv_error(path)))
        .collect()
}

pub fn parse_feature_sets<R: Read>(reader: R, path: &Path) -> Result<FeatureSets, CatalogueError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut feature_sets = FeatureSets::new();
    for row in csv_reader.deserialize::<FeatureRow>() {
        let FeatureRow {
            feature_set,
            question,
        } = row.map_err(csv_error(path))?;
        let question = QuestionId::new(question);

        let features = feature_sets.entry(feature_set.clone()).or_default();
        if features.contains(&question) {
            return Err(CatalogueError::DuplicateFeature {
                feature_set,
                question,
            });
        }
        features.push(question);
    }

    Ok(feature_sets)
}

/// Bind each performance-table row to its feature list and model, then validate the whole.
pub fn assemble<F>(
    questions: QuestionCatalogue,
    units: Vec<UnitRecord>,
    feature_sets: &FeatureSets,
    mut load_artifact: F,
) -> Result<ScreeningCatalogue, CatalogueError>
where
    F: FnMut(&str) -> Result<ModelArtifact, CatalogueError>,
{
    let mut bound = Vec::with_capacity(units.len());
    for record in units {
        let unit_id = UnitId::new(record.unit);
        let features = feature_sets.get(&record.feature_set).ok_or_else(|| {
            CatalogueError::UnknownFeatureSet {
                unit: unit_id.clone(),
                feature_set: record.feature_set.clone(),
            }
        })?;
        let model = load_artifact(&record.artifact)?.into_classifier();

        bound.push(ClassifierUnit::new(
            unit_id,
            Category::new(record.category),
            record.algorithm,
            features.clone(),
            record.weight,
            model,
        )?);
    }

    ScreeningCatalogue::new(questions, ClassifierCatalogue::new(bound)?)
}
