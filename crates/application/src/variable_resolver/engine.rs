//! Target resolution engine
//!
//! Turns a parsed reference into the environment record that holds the
//! requested output, issuing one to three API calls depending on the selector.

use importer_domain::{EnvironmentRecord, ReferenceSpec, ResolvedImport, TargetSelector};
use tracing::{debug, warn};

use super::extractor::extract_output;
use crate::ports::EnvironmentApi;
use crate::{ApplicationError, ApplicationResult};

/// Resolves references against the env0 API.
///
/// Workflow lookups are rooted at the current environment. The workflow
/// record is fetched once per resolver and reused for every workflow
/// reference in the run.
pub struct TargetResolver<A> {
    api: A,
    current_environment_id: String,
    workflow: Option<EnvironmentRecord>,
}

impl<A: EnvironmentApi> TargetResolver<A> {
    /// Creates a resolver rooted at the given current environment.
    #[must_use]
    pub fn new(api: A, current_environment_id: impl Into<String>) -> Self {
        Self {
            api,
            current_environment_id: current_environment_id.into(),
            workflow: None,
        }
    }

    #[cfg(test)]
    const fn api(&self) -> &A {
        &self.api
    }

    /// Fetches the environment a reference points at.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Resolution` if a name lookup is empty, a
    /// workflow child cannot be found or a workflow hop fails. Other API
    /// errors are propagated unchanged.
    pub async fn resolve(&mut self, spec: &ReferenceSpec) -> ApplicationResult<EnvironmentRecord> {
        debug!(key = %spec.input_key, selector = %spec.selector, "resolving reference");

        match &spec.selector {
            TargetSelector::ById(id) => self.api.get_environment(id).await,
            TargetSelector::ByName(name) => self.resolve_by_name(name).await,
            TargetSelector::ByWorkflowParent(parent) => {
                let sibling_id = self.workflow_sibling_id(parent).await?;
                debug!(parent = %parent, environment_id = %sibling_id, "resolved workflow child");
                self.api.get_environment(&sibling_id).await
            }
        }
    }

    /// Resolves a reference and extracts the requested output.
    ///
    /// # Errors
    ///
    /// See [`TargetResolver::resolve`].
    pub async fn resolve_import(&mut self, spec: &ReferenceSpec) -> ApplicationResult<ResolvedImport> {
        let record = self.resolve(spec).await?;
        let value = extract_output(&record, &spec.output_key);

        debug!(
            key = %spec.input_key,
            environment = %record.name,
            environment_id = %record.id,
            output = %spec.output_key,
            value = ?value,
            "resolved import"
        );

        Ok(ResolvedImport::new(spec, record.id, record.name, value))
    }

    async fn resolve_by_name(&self, name: &str) -> ApplicationResult<EnvironmentRecord> {
        let mut matches = self.api.find_environments(name).await?;

        if matches.len() > 1 {
            warn!(
                name = %name,
                count = matches.len(),
                "environment name is not unique, using the first match"
            );
        }

        if matches.is_empty() {
            return Err(ApplicationError::Resolution(format!(
                "no environment named '{name}'"
            )));
        }

        Ok(matches.swap_remove(0))
    }

    async fn workflow_sibling_id(&mut self, parent: &str) -> ApplicationResult<String> {
        let workflow = self.workflow().await?;

        workflow
            .workflow_child_id(parent)
            .map(ToString::to_string)
            .ok_or_else(|| {
                ApplicationError::Resolution(format!(
                    "workflow '{}' has no environment named '{parent}'",
                    workflow.name
                ))
            })
    }

    async fn workflow(&mut self) -> ApplicationResult<&EnvironmentRecord> {
        if self.workflow.is_none() {
            if self.current_environment_id.is_empty() {
                return Err(ApplicationError::Config(
                    "current environment ID is required for workflow references".into(),
                ));
            }

            let current = self
                .api
                .get_environment(&self.current_environment_id)
                .await
                .map_err(|e| {
                    ApplicationError::Resolution(format!(
                        "failed to fetch current environment '{}': {e}",
                        self.current_environment_id
                    ))
                })?;
            let workflow_id = current.workflow_environment().ok_or_else(|| {
                ApplicationError::Resolution(format!(
                    "environment '{}' is not part of a workflow",
                    current.id
                ))
            })?;
            debug!(environment_id = %current.id, workflow_id = %workflow_id, "found workflow");

            let workflow = self.api.get_environment(workflow_id).await.map_err(|e| {
                ApplicationError::Resolution(format!(
                    "failed to fetch workflow environment '{workflow_id}': {e}"
                ))
            })?;
            self.workflow = Some(workflow);
        }

        self.workflow.as_ref().ok_or_else(|| {
            ApplicationError::Resolution("workflow environment unavailable".into())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use importer_domain::{EncodingHint, OutputValue};
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct MockApi {
        by_id: HashMap<String, EnvironmentRecord>,
        by_name: HashMap<String, Vec<EnvironmentRecord>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockApi {
        fn with_environment(mut self, record: EnvironmentRecord) -> Self {
            self.by_id.insert(record.id.clone(), record);
            self
        }

        fn with_name(mut self, name: &str, records: Vec<EnvironmentRecord>) -> Self {
            self.by_name.insert(name.to_string(), records);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("Lock poisoned").clone()
        }
    }

    #[async_trait]
    impl EnvironmentApi for MockApi {
        async fn get_environment(&self, id: &str) -> ApplicationResult<EnvironmentRecord> {
            self.calls.lock().expect("Lock poisoned").push(format!("id:{id}"));
            self.by_id.get(id).cloned().ok_or_else(|| ApplicationError::Api {
                path: format!("/environments/{id}"),
                status: "404 Not Found".into(),
            })
        }

        async fn find_environments(&self, name: &str) -> ApplicationResult<Vec<EnvironmentRecord>> {
            self.calls.lock().expect("Lock poisoned").push(format!("name:{name}"));
            Ok(self.by_name.get(name).cloned().unwrap_or_default())
        }
    }

    fn spec(selector: TargetSelector) -> ReferenceSpec {
        ReferenceSpec::new("key", selector, "out", EncodingHint::Plain).unwrap()
    }

    fn workflow_api() -> MockApi {
        MockApi::default()
            .with_environment(EnvironmentRecord::new("E1", "current").with_workflow("W1"))
            .with_environment(
                EnvironmentRecord::new("W1", "stack")
                    .with_workflow_child("vpc", "E2")
                    .with_workflow_child("db", "E3"),
            )
            .with_environment(
                EnvironmentRecord::new("E2", "vpc").with_output("out", OutputValue::string("vpc-0123")),
            )
            .with_environment(EnvironmentRecord::new("E3", "db"))
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let api = MockApi::default().with_environment(EnvironmentRecord::new("E9", "direct"));
        let mut resolver = TargetResolver::new(api, "E1");

        let record = resolver.resolve(&spec(TargetSelector::ById("E9".into()))).await.unwrap();

        assert_eq!(record.name, "direct");
        assert_eq!(resolver.api().calls(), vec!["id:E9"]);
    }

    #[tokio::test]
    async fn test_resolve_by_name_picks_first() {
        let api = MockApi::default().with_name(
            "shared",
            vec![
                EnvironmentRecord::new("A", "shared"),
                EnvironmentRecord::new("B", "shared"),
            ],
        );
        let mut resolver = TargetResolver::new(api, "E1");
        let reference = spec(TargetSelector::ByName("shared".into()));

        let first = resolver.resolve(&reference).await.unwrap();
        let second = resolver.resolve(&reference).await.unwrap();

        assert_eq!(first.id, "A");
        assert_eq!(second.id, "A");
    }

    #[tokio::test]
    async fn test_resolve_by_name_empty() {
        let mut resolver = TargetResolver::new(MockApi::default(), "E1");

        let result = resolver.resolve(&spec(TargetSelector::ByName("missing".into()))).await;

        assert!(matches!(result, Err(ApplicationError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_resolve_workflow_parent() {
        let mut resolver = TargetResolver::new(workflow_api(), "E1");

        let import = resolver
            .resolve_import(&spec(TargetSelector::ByWorkflowParent("vpc".into())))
            .await
            .unwrap();

        assert_eq!(import.environment_id, "E2");
        assert_eq!(import.value, OutputValue::string("vpc-0123"));
        assert_eq!(resolver.api().calls(), vec!["id:E1", "id:W1", "id:E2"]);
    }

    #[tokio::test]
    async fn test_workflow_is_fetched_once_per_run() {
        let mut resolver = TargetResolver::new(workflow_api(), "E1");

        resolver.resolve(&spec(TargetSelector::ByWorkflowParent("vpc".into()))).await.unwrap();
        resolver.resolve(&spec(TargetSelector::ByWorkflowParent("db".into()))).await.unwrap();

        assert_eq!(
            resolver.api().calls(),
            vec!["id:E1", "id:W1", "id:E2", "id:E3"]
        );
    }

    #[tokio::test]
    async fn test_workflow_child_missing() {
        let mut resolver = TargetResolver::new(workflow_api(), "E1");

        let result = resolver
            .resolve(&spec(TargetSelector::ByWorkflowParent("cache".into())))
            .await;

        assert!(matches!(result, Err(ApplicationError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_current_environment_outside_workflow() {
        let api = MockApi::default().with_environment(EnvironmentRecord::new("E1", "lonely"));
        let mut resolver = TargetResolver::new(api, "E1");

        let result = resolver
            .resolve(&spec(TargetSelector::ByWorkflowParent("vpc".into())))
            .await;

        assert!(matches!(result, Err(ApplicationError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_failed_workflow_hop_is_resolution_error() {
        let api = MockApi::default()
            .with_environment(EnvironmentRecord::new("E1", "app").with_workflow("W9"));
        let mut resolver = TargetResolver::new(api, "E1");

        let result = resolver
            .resolve(&spec(TargetSelector::ByWorkflowParent("vpc".into())))
            .await;

        assert!(matches!(result, Err(ApplicationError::Resolution(_))));
        assert_eq!(resolver.api().calls(), vec!["id:E1", "id:W9"]);
    }

    #[tokio::test]
    async fn test_unknown_current_environment_is_resolution_error() {
        let mut resolver = TargetResolver::new(MockApi::default(), "E404");

        let result = resolver
            .resolve(&spec(TargetSelector::ByWorkflowParent("vpc".into())))
            .await;

        assert!(matches!(result, Err(ApplicationError::Resolution(_))));
    }

    #[tokio::test]
    async fn test_workflow_without_current_environment() {
        let mut resolver = TargetResolver::new(workflow_api(), "");

        let result = resolver
            .resolve(&spec(TargetSelector::ByWorkflowParent("vpc".into())))
            .await;

        assert!(matches!(result, Err(ApplicationError::Config(_))));
        assert!(resolver.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let mut resolver = TargetResolver::new(MockApi::default(), "E1");

        let result = resolver.resolve(&spec(TargetSelector::ById("nope".into()))).await;

        assert!(matches!(result, Err(ApplicationError::Api { .. })));
    }
}
