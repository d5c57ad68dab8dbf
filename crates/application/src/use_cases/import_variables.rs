//! Import variables use case

use importer_domain::{ReferenceSpec, ResolvedImport, VariableSource};
use tracing::{debug, info, warn};

use crate::ports::{EnvironmentApi, VariableMap, VariablesStore};
use crate::variable_resolver::{TargetResolver, assemble, parse_reference};
use crate::{ApplicationError, ApplicationResult};

/// Summary of one import run.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// References found across all inputs, in input order.
    pub references: Vec<ReferenceSpec>,

    /// Input keys that looked like references but could not be parsed.
    pub skipped: Vec<String>,

    /// Number of input entries that were literal values.
    pub literals: usize,

    /// Resolved imports, one per reference.
    pub imports: Vec<ResolvedImport>,

    /// The mapping written to the output file.
    pub outputs: VariableMap,
}

/// Resolves every reference in the input variables and writes the output file.
///
/// References are resolved one at a time in input order. The first API or
/// resolution failure aborts the run before anything is written.
pub struct ImportVariables<A, S> {
    resolver: TargetResolver<A>,
    store: S,
}

impl<A: EnvironmentApi, S: VariablesStore> ImportVariables<A, S> {
    /// Creates a new `ImportVariables` use case.
    pub fn new(api: A, store: S, current_environment_id: impl Into<String>) -> Self {
        Self {
            resolver: TargetResolver::new(api, current_environment_id),
            store,
        }
    }

    /// Returns the variables store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Executes the use case.
    ///
    /// # Errors
    ///
    /// Returns an error if the Terraform variables file is missing or
    /// unreadable, if any reference fails to resolve, or if the output cannot
    /// be written. Malformed references and an unreadable environment
    /// variables file are logged and skipped.
    pub async fn execute(&mut self) -> ApplicationResult<ImportReport> {
        let mut report = ImportReport::default();

        for (source, variables) in self.load_inputs().await? {
            collect_references(source, &variables, &mut report);
        }

        info!(
            references = report.references.len(),
            skipped = report.skipped.len(),
            literals = report.literals,
            "parsed input variables"
        );

        for spec in &report.references {
            let import = self.resolver.resolve_import(spec).await?;
            report.imports.push(import);
        }

        report.outputs = assemble(&report.imports);
        self.store.save(&report.outputs).await?;

        info!(imported = report.outputs.len(), "wrote imported variables");
        Ok(report)
    }

    async fn load_inputs(&self) -> ApplicationResult<Vec<(VariableSource, VariableMap)>> {
        let terraform = self
            .store
            .load(VariableSource::Terraform)
            .await?
            .ok_or_else(|| {
                ApplicationError::Storage(format!(
                    "{} not found",
                    VariableSource::Terraform.file_name()
                ))
            })?;

        let mut inputs = vec![(VariableSource::Terraform, terraform)];

        // The environment variables file is optional; a broken one is ignored.
        match self.store.load(VariableSource::Environment).await {
            Ok(Some(environment)) => inputs.push((VariableSource::Environment, environment)),
            Ok(None) => debug!(
                file = VariableSource::Environment.file_name(),
                "no environment variables file"
            ),
            Err(e) => warn!(
                file = VariableSource::Environment.file_name(),
                error = %e,
                "ignoring unreadable environment variables file"
            ),
        }

        Ok(inputs)
    }
}

fn collect_references(source: VariableSource, variables: &VariableMap, report: &mut ImportReport) {
    for (key, value) in variables {
        match parse_reference(key, value) {
            Ok(Some(spec)) => {
                debug!(key = %key, selector = %spec.selector, output = %spec.output_key, "found reference");
                report.references.push(spec.with_source(source));
            }
            Ok(None) => {
                debug!(key = %key, "skipping literal value");
                report.literals += 1;
            }
            Err(e) => {
                warn!(key = %key, file = source.file_name(), error = %e, "skipping malformed reference");
                report.skipped.push(key.clone());
            }
        }
    }
}
