//! Manifest Compiler
//!
//! Runs the full authoring pipeline over an [`AppManifest`] without touching
//! any service:
//!
//! 1. Build every entity schema (`SchemaBuilder`)
//! 2. Check feature sources are declared, then attach them (`FeatureAttacher`)
//! 3. Check example intents and validate example labels (`LabelValidator`)
//!
//! The result, [`CompiledApp`], only contains data that passed every check and
//! is what gets submitted to an NLU service.

use crate::models::{AppManifest, EntityNode, FeatureKind, LabeledExample, PhraseListDefinition};
use crate::services::error::{ManifestError, SchemaError};
use crate::services::feature_attacher::FeatureAttacher;
use crate::services::label_validator::LabelValidator;
use crate::services::schema_builder::SchemaBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A manifest whose schemas are built and enriched and whose examples validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledApp {
    pub name: String,
    pub version_id: String,
    pub culture: Option<String>,
    pub description: Option<String>,
    pub intents: Vec<String>,
    pub prebuilt_entities: Vec<String>,
    pub phrase_lists: Vec<PhraseListDefinition>,
    pub schemas: Vec<EntityNode>,
    pub examples: Vec<LabeledExample>,
}

impl CompiledApp {
    pub fn schema(&self, name: &str) -> Option<&EntityNode> {
        self.schemas.iter().find(|s| s.name() == name)
    }
}

impl AppManifest {
    /// Build, enrich and validate everything in this manifest
    pub fn compile(&self) -> Result<CompiledApp, ManifestError> {
        ManifestCompiler::new().compile(self)
    }
}

#[derive(Debug, Default)]
pub struct ManifestCompiler {
    builder: SchemaBuilder,
}

impl ManifestCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(&self, manifest: &AppManifest) -> Result<CompiledApp, ManifestError> {
        check_metadata(manifest)?;

        let intents = unique_names("intent", &manifest.intents)?;
        let prebuilts = unique_names("prebuilt entity", &manifest.prebuilt_entities)?;
        let phrase_list_names: Vec<String> =
            manifest.phrase_lists.iter().map(|p| p.name.clone()).collect();
        let phrase_lists = unique_names("phrase list", &phrase_list_names)?;

        let mut schemas: Vec<EntityNode> = Vec::with_capacity(manifest.entities.len());
        for definition in &manifest.entities {
            if schemas.iter().any(|s| s.name() == definition.name) {
                return Err(ManifestError::schema(
                    definition.name.clone(),
                    SchemaError::duplicate_name(&[], definition.name.clone()),
                ));
            }
            let schema = self
                .builder
                .build(definition)
                .map_err(|e| ManifestError::schema(definition.name.clone(), e))?;
            schemas.push(schema);
        }

        for assignment in &manifest.features {
            let declared = match assignment.kind {
                FeatureKind::PhraseList => phrase_lists.contains(assignment.source.as_str()),
                FeatureKind::PrebuiltModel => prebuilts.contains(assignment.source.as_str()),
                FeatureKind::ModelFeature => {
                    prebuilts.contains(assignment.source.as_str())
                        || schemas.iter().any(|s| s.name() == assignment.source)
                }
            };
            if !declared {
                return Err(ManifestError::UnknownFeatureSource {
                    kind: assignment.kind,
                    source_name: assignment.source.clone(),
                });
            }

            let schema = schemas
                .iter_mut()
                .find(|s| s.name() == assignment.entity)
                .ok_or_else(|| ManifestError::UnknownEntitySchema(assignment.entity.clone()))?;

            FeatureAttacher::attach(schema, assignment.path.as_slice(), assignment.to_feature())
                .map_err(|e| ManifestError::schema(assignment.entity.clone(), e))?;
        }

        let mut examples = Vec::with_capacity(manifest.examples.len());
        for example in &manifest.examples {
            if !intents.contains(example.intent.as_str()) {
                return Err(ManifestError::UnknownIntent {
                    text: example.text.clone(),
                    intent: example.intent.clone(),
                });
            }

            for label in &example.labels {
                if !schemas.iter().any(|s| s.name() == label.entity_name) {
                    return Err(ManifestError::UnknownEntitySchema(label.entity_name.clone()));
                }
            }

            if let Err(e) = LabelValidator::validate_all(&schemas, &example.text, &example.labels)
            {
                tracing::warn!("Rejected example '{}': {}", example.text, e);
                return Err(ManifestError::invalid_example(example.text.clone(), e));
            }

            examples.push(LabeledExample {
                text: example.text.clone(),
                intent_name: example.intent.clone(),
                entity_labels: example.labels.clone(),
            });
        }

        tracing::info!(
            "Compiled app '{}' v{}: {} intent(s), {} schema(s), {} feature(s), {} example(s)",
            manifest.name,
            manifest.version_id,
            manifest.intents.len(),
            schemas.len(),
            manifest.features.len(),
            examples.len()
        );

        Ok(CompiledApp {
            name: manifest.name.clone(),
            version_id: manifest.version_id.clone(),
            culture: manifest.culture.clone(),
            description: manifest.description.clone(),
            intents: manifest.intents.clone(),
            prebuilt_entities: manifest.prebuilt_entities.clone(),
            phrase_lists: manifest.phrase_lists.clone(),
            schemas,
            examples,
        })
    }
}

fn check_metadata(manifest: &AppManifest) -> Result<(), ManifestError> {
    if manifest.name.trim().is_empty() {
        return Err(ManifestError::invalid("application name cannot be empty"));
    }
    if manifest.version_id.trim().is_empty() {
        return Err(ManifestError::invalid("versionId cannot be empty"));
    }
    for list in &manifest.phrase_lists {
        if list.phrases.iter().all(|p| p.trim().is_empty()) {
            return Err(ManifestError::invalid(format!(
                "phrase list '{}' has no phrases",
                list.name
            )));
        }
    }
    Ok(())
}

/// Names must be non-blank and unique within their category
fn unique_names<'a>(
    category: &str,
    names: &'a [String],
) -> Result<HashSet<&'a str>, ManifestError> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            return Err(ManifestError::invalid(format!("{} name cannot be empty", category)));
        }
        if !seen.insert(name.as_str()) {
            return Err(ManifestError::invalid(format!(
                "duplicate {} '{}'",
                category, name
            )));
        }
    }
    Ok(seen)
}
